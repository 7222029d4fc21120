//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level `Config`, `ServerConfig` and loading
//! - [`interpreter`]: Interpreter behaviour (`InterpreterConfig`, `ErrorFormatConfig`)
//! - [`instrument`]: Identity and setting limits of the served instrument
//! - [`validation`]: Startup checks across all sections

mod instrument;
mod interpreter;
mod types;
mod validation;

pub use instrument::{InstrumentConfig, Limits};
pub use types::{Config, ConfigError};
