//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use super::instrument::InstrumentConfig;
use super::interpreter::InterpreterConfig;
use super::validation::{self, ValidationError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid interpreter settings: {0}")]
    Protocol(#[from] scpi_proto::ProtocolError),
}

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listener settings.
    pub server: ServerConfig,
    /// Per-session interpreter behaviour.
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    /// The instrument served to every session.
    #[serde(default)]
    pub instrument: InstrumentConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check the loaded values, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validation::validate(self)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name used in logs (e.g., "bench-psu-1").
    #[serde(default = "default_name")]
    pub name: String,
    /// Address to bind to (e.g., "0.0.0.0:5025").
    pub listen: SocketAddr,
    /// Longest accepted program message in bytes, line terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

fn default_name() -> String {
    "scpid".to_string()
}

fn default_max_line_len() -> usize {
    scpi_proto::DEFAULT_MAX_LINE_LEN
}
