//! scpid - SCPI instrument daemon
//!
//! Serves a simulated instrument over TCP, one SCPI interpreter session per
//! connection.

mod config;
mod error;
mod instrument;
mod network;
mod telemetry;

use crate::config::Config;
use crate::instrument::Instrument;
use crate::network::Gateway;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        name = %config.server.name,
        listen = %config.server.listen,
        "Starting scpid"
    );

    let instrument = Instrument::new(config.instrument.clone()).shared();
    let gateway = Gateway::bind(&config, instrument).await?;
    info!(addr = %gateway.local_addr()?, "Accepting sessions");

    tokio::select! {
        result = gateway.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    Ok(())
}
