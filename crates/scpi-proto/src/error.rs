//! Error types for the SCPI protocol library.
//!
//! Tokenizing, dispatch and numeric decoding never fail: their outcomes are
//! reported through [`ResultCode`](crate::ResultCode) values and the
//! instrument error queue. The errors here cover the transport side, where
//! lines are framed out of a byte stream.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line exceeded maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Response terminator must be exactly one byte.
    #[error("invalid terminator {0:?}: must be a single byte")]
    InvalidTerminator(String),
}
