//! RON configuration for the server

use clicker_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080")
    pub listen: String,
    /// Milliseconds between auto-click ticks
    pub tick_interval_ms: u64,
    /// Where the team snapshot is written
    pub snapshot_path: PathBuf,
    /// Seconds between periodic snapshots
    pub snapshot_interval_secs: u64,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
    /// Game tunables
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            tick_interval_ms: 1000,
            snapshot_path: PathBuf::from("data/team.ron"),
            snapshot_interval_secs: 60,
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a RON file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::Io(e.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen.trim().is_empty() {
            return Err(ConfigError::Validation("listen address is empty".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Validation("tick_interval_ms must be positive".into()));
        }
        if self.snapshot_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "snapshot_interval_secs must be positive".into(),
            ));
        }
        self.engine
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
