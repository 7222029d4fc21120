//! Per-command responses.

use std::fmt;

/// Outcome of executing one program message unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// A handler ran and returned a response.
    Success,
    /// No registered path matched the header.
    NotFound,
    /// The header matched a node with no handler attached.
    NoHandler,
    /// The handler ran but returned nothing.
    NoHandlerResponse,
}

impl ResultCode {
    /// Static label for logs.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::NoHandler => "no_handler",
            Self::NoHandlerResponse => "no_handler_response",
        }
    }

    /// Whether this code reports success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one program message unit: a code plus response text.
///
/// Text is raw bytes; most handlers produce ASCII, but nothing in the
/// protocol requires it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: ResultCode,
    text: Vec<u8>,
}

impl Response {
    /// Create a response with an explicit code and text.
    pub fn new(code: ResultCode, text: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    /// A successful response carrying `text`.
    pub fn text(text: impl Into<Vec<u8>>) -> Self {
        Self::new(ResultCode::Success, text)
    }

    /// A successful response with no text (typical for setting commands).
    pub fn empty() -> Self {
        Self::new(ResultCode::Success, Vec::new())
    }

    /// An empty response carrying a failure code.
    pub fn failure(code: ResultCode) -> Self {
        Self::new(code, Vec::new())
    }

    /// Result code.
    #[inline]
    pub fn code(&self) -> ResultCode {
        self.code
    }

    /// Response text.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// Whether the response has any text to send.
    #[inline]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Take ownership of the text.
    pub fn into_bytes(self) -> Vec<u8> {
        self.text
    }
}
