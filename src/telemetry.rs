//! Telemetry utilities for session tracing.

use std::time::Instant;

use tracing::debug;

/// Guard that logs how long a program message took to execute.
pub struct LineTimer {
    line_len: usize,
    start: Instant,
}

impl LineTimer {
    /// Start timing a line of `line_len` bytes.
    pub fn new(line_len: usize) -> Self {
        Self {
            line_len,
            start: Instant::now(),
        }
    }
}

impl Drop for LineTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        debug!(bytes = self.line_len, micros, "Program message executed");
    }
}

/// Standardized span constructors for session observability.
pub mod spans {
    use std::net::SocketAddr;

    use tracing::{info_span, Span};

    /// Create a span for a client session.
    pub fn session(id: u64, addr: &SocketAddr) -> Span {
        info_span!("session", id, addr = %addr)
    }
}
