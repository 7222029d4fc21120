//! Program message execution.
//!
//! An [`Interpreter`] owns a command tree and a session [`Context`]. Each
//! call to [`Interpreter::execute`] splits a line into `;`-separated program
//! message units, runs every unit through tokenizer, dispatcher and handler,
//! and writes the joined responses:
//!
//! ```text
//! *IDN?;SOUR:FREQ 1kHz;SYST:ERR?   ->   <idn>;;<error><terminator>
//! ```
//!
//! A unit whose response is empty contributes only its separator. When no
//! unit produced any text, nothing is written, not even the terminator.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;

use crate::context::{Context, Handler};
use crate::error::ProtocolError;
use crate::error_queue::{ErrorQueue, ErrorRecord};
use crate::response::{ResultCode, Response};
use crate::token::{tokenize, Arguments};
use crate::tree::{CommandTree, HandlerRef, NodeId, Placement};

/// Separator between program message units and between their responses.
pub const UNIT_SEPARATOR: u8 = b';';

/// How `SYSTem:ERRor?` renders a popped record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorFormat {
    /// Description text only, e.g. `Undefined header`.
    #[default]
    Description,
    /// IEEE 488.2 style `<code>,"<description>"`, e.g. `-113,"Undefined header"`.
    Standard,
}

impl ErrorFormat {
    /// Render a record.
    pub fn render(self, record: &ErrorRecord) -> String {
        match self {
            Self::Description => record.description().to_string(),
            Self::Standard => record.to_string(),
        }
    }
}

/// Interpreter behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct InterpreterOptions {
    /// Bound on the error queue; `None` for unbounded.
    pub error_queue_capacity: Option<usize>,
    /// Queue `-113,"Undefined header"` whenever a unit matches no command.
    pub report_unknown_headers: bool,
    /// Reply format of the built-in error query.
    pub error_format: ErrorFormat,
}

/// Pop the oldest error and reply with it.
struct PopError {
    format: ErrorFormat,
}

impl<S> Handler<S> for PopError {
    fn call(&self, ctx: &mut Context<S>, _args: &Arguments<'_>) -> Option<Response> {
        let record = ctx.errors.pop();
        Some(Response::text(self.format.render(&record)))
    }
}

/// A SCPI session: command tree, error queue and instrument state.
pub struct Interpreter<S = ()> {
    tree: CommandTree<S>,
    ctx: Context<S>,
    options: InterpreterOptions,
    system: NodeId,
}

impl<S: Default> Default for Interpreter<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Interpreter<S> {
    /// Create an interpreter with default options.
    pub fn new(state: S) -> Self {
        Self::with_options(state, InterpreterOptions::default())
    }

    /// Create an interpreter with the built-in `SYSTem:ERRor` commands
    /// registered.
    pub fn with_options(state: S, options: InterpreterOptions) -> Self {
        let errors = match options.error_queue_capacity {
            Some(capacity) => ErrorQueue::with_capacity(capacity),
            None => ErrorQueue::new(),
        };

        let mut tree = CommandTree::new();
        let pop_error: HandlerRef<S> = Arc::new(PopError {
            format: options.error_format,
        });

        let root = tree.root();
        let system = tree.register(root, Placement::Child, "SYSTEM", "SYST", None);
        let error = tree.register(system, Placement::Child, "ERROR", "ERR", None);
        tree.register(
            system,
            Placement::Child,
            "ERROR?",
            "ERR?",
            Some(Arc::clone(&pop_error)),
        );
        tree.register(error, Placement::Child, "NEXT?", "NEXT?", Some(pop_error));

        Self {
            tree,
            ctx: Context::with_queue(state, errors),
            options,
            system,
        }
    }

    /// The command tree.
    pub fn tree(&self) -> &CommandTree<S> {
        &self.tree
    }

    /// The `SYSTem` node, for registering further system commands under it.
    pub fn system_node(&self) -> NodeId {
        self.system
    }

    /// Register a command. See [`CommandTree::register`].
    pub fn register(
        &mut self,
        parent: NodeId,
        placement: Placement,
        long_name: impl Into<Cow<'static, str>>,
        short_name: impl Into<Cow<'static, str>>,
        handler: Option<HandlerRef<S>>,
    ) -> NodeId {
        self.tree
            .register(parent, placement, long_name, short_name, handler)
    }

    /// Register a mixed-case keyword. See [`CommandTree::register_keyword`].
    pub fn register_keyword(
        &mut self,
        parent: NodeId,
        placement: Placement,
        keyword: &str,
        handler: Option<HandlerRef<S>>,
    ) -> NodeId {
        self.tree
            .register_keyword(parent, placement, keyword, handler)
    }

    /// Session context.
    pub fn context(&self) -> &Context<S> {
        &self.ctx
    }

    /// Session context, mutably.
    pub fn context_mut(&mut self) -> &mut Context<S> {
        &mut self.ctx
    }

    /// Options in effect.
    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// Execute a single program message unit (no `;` splitting).
    pub fn execute_command(&mut self, unit: &[u8]) -> Response {
        let tokens = tokenize(unit);

        let response = match self.tree.find(&tokens) {
            None => {
                if self.options.report_unknown_headers {
                    self.ctx.errors.queue(ErrorRecord::undefined_header());
                }
                Response::failure(ResultCode::NotFound)
            }
            Some(id) => match self.tree.node(id).handler() {
                None => Response::failure(ResultCode::NoHandler),
                Some(handler) => handler
                    .call(&mut self.ctx, &tokens.arguments())
                    .unwrap_or_else(|| Response::failure(ResultCode::NoHandlerResponse)),
            },
        };

        debug!(
            unit = %String::from_utf8_lossy(unit),
            code = %response.code(),
            bytes = response.as_bytes().len(),
            "executed program unit"
        );
        response
    }

    /// Execute every unit of `line` and collect the responses in order.
    ///
    /// An empty line yields no responses; a trailing `;` does not start an
    /// extra unit.
    pub fn evaluate(&mut self, line: &[u8]) -> Vec<Response> {
        split_units(line)
            .map(|unit| self.execute_command(unit))
            .collect()
    }

    /// Execute `line` and write the joined responses through `write`.
    ///
    /// `write` is called once per non-empty response text, once per `;`
    /// separator and once for the `terminator`. Returns the result code of
    /// every unit in order.
    pub fn execute<W>(&mut self, line: &[u8], mut write: W, terminator: u8) -> Vec<ResultCode>
    where
        W: FnMut(&[u8]),
    {
        let responses = self.evaluate(line);

        if responses.iter().any(Response::has_text) {
            let last = responses.len() - 1;
            for (i, response) in responses.iter().enumerate() {
                if response.has_text() {
                    write(response.as_bytes());
                }
                if i == last {
                    write(&[terminator]);
                } else {
                    write(&[UNIT_SEPARATOR]);
                }
            }
        }

        responses.iter().map(Response::code).collect()
    }
}

/// Parse a configured response terminator, which must be exactly one byte.
pub fn parse_terminator(text: &str) -> crate::Result<u8> {
    match text.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(ProtocolError::InvalidTerminator(text.to_string())),
    }
}

/// Split a line into program message units on `;`.
pub fn split_units(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = line.strip_suffix(&[UNIT_SEPARATOR]).unwrap_or(line);
    let empty = line.is_empty();
    body.split(|&b| b == UNIT_SEPARATOR).filter(move |_| !empty)
}
