//! Interpreter session configuration.

use serde::Deserialize;

use scpi_proto::{parse_terminator, ErrorFormat, InterpreterOptions, ProtocolError};

/// Reply format of `SYSTem:ERRor?`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFormatConfig {
    /// Description text only.
    #[default]
    Description,
    /// `<code>,"<description>"`.
    Standard,
}

impl From<ErrorFormatConfig> for ErrorFormat {
    fn from(format: ErrorFormatConfig) -> Self {
        match format {
            ErrorFormatConfig::Description => ErrorFormat::Description,
            ErrorFormatConfig::Standard => ErrorFormat::Standard,
        }
    }
}

/// Settings applied to every session's interpreter.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterConfig {
    /// Byte appended after each response line (default: "\n").
    #[serde(default = "default_terminator")]
    pub terminator: String,
    /// Bound on each session's error queue; unbounded when absent.
    #[serde(default)]
    pub error_queue_capacity: Option<usize>,
    /// Queue `-113 "Undefined header"` for unknown commands.
    #[serde(default)]
    pub report_unknown_headers: bool,
    /// Reply format of the error query.
    #[serde(default)]
    pub error_format: ErrorFormatConfig,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            terminator: default_terminator(),
            error_queue_capacity: None,
            report_unknown_headers: false,
            error_format: ErrorFormatConfig::default(),
        }
    }
}

fn default_terminator() -> String {
    "\n".to_string()
}

impl InterpreterConfig {
    /// The response terminator as a single byte.
    pub fn terminator_byte(&self) -> Result<u8, ProtocolError> {
        parse_terminator(&self.terminator)
    }

    /// Options for constructing a session interpreter.
    pub fn options(&self) -> InterpreterOptions {
        InterpreterOptions {
            error_queue_capacity: self.error_queue_capacity,
            report_unknown_headers: self.report_unknown_headers,
            error_format: self.error_format.into(),
        }
    }
}
