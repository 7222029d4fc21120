//! Gateway - TCP listener that accepts incoming sessions.
//!
//! The Gateway binds a socket and spawns a Connection task for each
//! incoming client. Every session gets a fresh interpreter over the shared
//! instrument.

use crate::config::Config;
use crate::instrument::{build_interpreter, SharedInstrument};
use crate::network::connection::SessionSettings;
use crate::network::Connection;
use crate::telemetry::spans;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, Instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    instrument: SharedInstrument,
    settings: SessionSettings,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(config: &Config, instrument: SharedInstrument) -> anyhow::Result<Self> {
        let settings = SessionSettings::from_config(config)?;

        let probe = build_interpreter(Arc::clone(&instrument), settings.options.clone());
        let paths = probe.tree().paths();
        for path in &paths {
            debug!(%path, "Command registered");
        }

        let listener = TcpListener::bind(config.server.listen).await?;
        info!(commands = paths.len(), "Listener bound");

        Ok(Self {
            listener,
            instrument,
            settings,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the task is cancelled.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        let mut next_id: u64 = 0;

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    next_id += 1;
                    let id = next_id;
                    info!(%addr, id, "Connection accepted");

                    let interpreter = build_interpreter(
                        Arc::clone(&self.instrument),
                        self.settings.options.clone(),
                    );
                    let connection = Connection::new(stream, addr, interpreter, &self.settings);

                    tokio::spawn(
                        async move {
                            if let Err(e) = connection.run().await {
                                error!(error = %e, "Connection error");
                            }
                            info!("Connection closed");
                        }
                        .instrument(spans::session(id, &addr)),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
