//! Handler context and the handler trait.
//!
//! Defines the `Context<S>` passed to every command handler. The type
//! parameter `S` is the instrument state owned by the interpreter session.

use crate::error_queue::{ErrorQueue, ErrorRecord};
use crate::response::Response;
use crate::token::Arguments;

/// Mutable session state visible to handlers.
#[derive(Debug, Default)]
pub struct Context<S = ()> {
    /// The session's error/event queue.
    pub errors: ErrorQueue,
    /// Instrument-specific state.
    pub state: S,
}

impl<S> Context<S> {
    /// Create a context with an unbounded error queue.
    pub fn new(state: S) -> Self {
        Self::with_queue(state, ErrorQueue::new())
    }

    /// Create a context with the given error queue.
    pub fn with_queue(state: S, errors: ErrorQueue) -> Self {
        Self { errors, state }
    }

    /// Queue an error record. Shorthand for `self.errors.queue(record)`.
    #[inline]
    pub fn report(&mut self, record: ErrorRecord) {
        self.errors.queue(record);
    }
}

/// A command endpoint.
///
/// Receives only the argument tokens that followed the matched header.
/// Returning `None` is a contract violation that the interpreter reports as
/// [`ResultCode::NoHandlerResponse`](crate::ResultCode::NoHandlerResponse).
pub trait Handler<S>: Send + Sync {
    /// Execute the command.
    fn call(&self, ctx: &mut Context<S>, args: &Arguments<'_>) -> Option<Response>;
}

impl<S, F> Handler<S> for F
where
    F: Fn(&mut Context<S>, &Arguments<'_>) -> Option<Response> + Send + Sync,
{
    fn call(&self, ctx: &mut Context<S>, args: &Arguments<'_>) -> Option<Response> {
        self(ctx, args)
    }
}
