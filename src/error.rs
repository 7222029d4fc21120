//! Unified error handling for scpid.
//!
//! Command handlers never fail the connection: a rejected command is turned
//! into an SCPI error record and queued for `SYSTem:ERRor?`.

use scpi_proto::ErrorRecord;
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    #[error("missing parameter")]
    MissingParameter,

    #[error("expected {expected} parameter(s), got {actual}")]
    ParameterNotAllowed { expected: usize, actual: usize },

    #[error("{value} outside {min}..={max}")]
    DataOutOfRange { value: f64, min: f64, max: f64 },

    #[error("wrong data type: {0:?}")]
    DataType(String),

    #[error("invalid suffix: {0:?}")]
    InvalidSuffix(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::ParameterNotAllowed { .. } => "parameter_not_allowed",
            Self::DataOutOfRange { .. } => "data_out_of_range",
            Self::DataType(_) => "data_type_error",
            Self::InvalidSuffix(_) => "invalid_suffix",
        }
    }

    /// Convert to the SCPI error record queued for the session.
    pub fn to_error_record(&self) -> ErrorRecord {
        match self {
            Self::MissingParameter => ErrorRecord::missing_parameter(),
            Self::ParameterNotAllowed { .. } => ErrorRecord::parameter_not_allowed(),
            Self::DataOutOfRange { .. } => ErrorRecord::data_out_of_range(),
            Self::DataType(_) => ErrorRecord::data_type_error(),
            Self::InvalidSuffix(_) => ErrorRecord::new(-131, "Invalid suffix"),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;
