//! # scpi-proto
//!
//! A Rust library for interpreting SCPI (Standard Commands for Programmable
//! Instruments) program messages.
//!
//! ## Features
//!
//! - Zero-copy tokenizing of headers and program data
//! - Hierarchical command tree with long/short keyword forms
//! - Numeric decoding with exponents, SI prefixes, units and `MIN`/`MAX`/`DEFAULT`
//! - Instrument error queue with the built-in `SYSTem:ERRor?` query
//! - Composite (`;`-separated) line execution with joined responses
//! - Optional Tokio line codec for serving an interpreter over a socket

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use scpi_proto::{endpoint, Arguments, Context, Interpreter, Placement, Response};
//!
//! let mut interp = Interpreter::new(0.0_f64);
//! let root = interp.tree().root();
//! let volt = interp.register_keyword(
//!     root,
//!     Placement::Child,
//!     "VOLTage",
//!     endpoint(|ctx: &mut Context<f64>, args: &Arguments<'_>| {
//!         ctx.state = args.get(0)?.numeric(0.0, 0.0, 10.0).value;
//!         Some(Response::empty())
//!     }),
//! );
//! interp.register_keyword(
//!     volt,
//!     Placement::Sibling,
//!     "VOLTage?",
//!     endpoint(|ctx: &mut Context<f64>, _: &Arguments<'_>| {
//!         Some(Response::text(ctx.state.to_string()))
//!     }),
//! );
//!
//! let mut out = Vec::new();
//! interp.execute(b"VOLT 2500mV;VOLT?;SYST:ERR?", |b| out.extend_from_slice(b), b'\n');
//! assert_eq!(out, b";2.5;No error\n");
//! ```

pub mod casemap;
pub mod context;
pub mod engine;
pub mod error;
pub mod error_queue;
#[cfg(feature = "tokio")]
pub mod line;
pub mod numeric;
pub mod response;
pub mod token;
pub mod tree;

pub use self::casemap::{header_eq, short_form};
pub use self::context::{Context, Handler};
pub use self::engine::{
    parse_terminator, split_units, ErrorFormat, Interpreter, InterpreterOptions,
};
pub use self::error::{ProtocolError, Result};
pub use self::error_queue::{ErrorQueue, ErrorRecord};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::numeric::{parse_numeric, Numeric};
pub use self::response::{Response, ResultCode};
pub use self::token::{tokenize, Argument, Arguments, Token, TokenKind, Tokens};
pub use self::tree::{endpoint, CommandNode, CommandTree, HandlerRef, NodeId, Placement};
