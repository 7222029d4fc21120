//! Connection - Handles an individual client session.
//!
//! Each Connection runs in its own Tokio task. Program messages are framed
//! by [`LineCodec`], executed by the session's own interpreter, and the
//! joined response (if any) is written back before the next line is read.

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use scpi_proto::{Interpreter, InterpreterOptions, LineCodec, ProtocolError};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::instrument::SharedInstrument;
use crate::telemetry::LineTimer;

/// Per-session settings derived from the configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Interpreter options for each new session.
    pub options: InterpreterOptions,
    /// Response terminator byte.
    pub terminator: u8,
    /// Longest accepted line, terminator included.
    pub max_line_len: usize,
}

impl SessionSettings {
    /// Derive session settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            options: config.interpreter.options(),
            terminator: config.interpreter.terminator_byte()?,
            max_line_len: config.server.max_line_len,
        })
    }
}

/// A client connection handler.
pub struct Connection {
    addr: SocketAddr,
    stream: TcpStream,
    interpreter: Interpreter<SharedInstrument>,
    terminator: u8,
    max_line_len: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        interpreter: Interpreter<SharedInstrument>,
        settings: &SessionSettings,
    ) -> Self {
        Self {
            addr,
            stream,
            interpreter,
            terminator: settings.terminator,
            max_line_len: settings.max_line_len,
        }
    }

    /// Run the connection read loop until the peer disconnects.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            addr,
            stream,
            mut interpreter,
            terminator,
            max_line_len,
        } = self;

        info!(%addr, "Client connected");
        let mut framed = Framed::new(stream, LineCodec::with_max_len(max_line_len));

        while let Some(result) = framed.next().await {
            match result {
                Ok(line) => {
                    let reply = respond(&mut interpreter, &line, terminator);
                    if !reply.is_empty() {
                        framed.send(reply).await?;
                    }
                }
                Err(ProtocolError::LineTooLong { actual, limit }) => {
                    warn!(actual, limit, "Line too long, closing session");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            pending_errors = interpreter.context().errors.len(),
            "Client disconnected"
        );
        Ok(())
    }
}

/// Execute one program message and collect the bytes to send back.
fn respond(
    interpreter: &mut Interpreter<SharedInstrument>,
    line: &Bytes,
    terminator: u8,
) -> Vec<u8> {
    let _timer = LineTimer::new(line.len());
    let mut reply = Vec::new();
    let codes = interpreter.execute(line, |bytes| reply.extend_from_slice(bytes), terminator);
    if let Some(code) = codes.iter().find(|code| !code.is_success()) {
        debug!(%code, units = codes.len(), "Program message had failing units");
    }
    reply
}
