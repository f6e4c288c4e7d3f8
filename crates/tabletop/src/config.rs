//! Configuration management for the tabletop server.
//!
//! This module handles loading, validation, and conversion of server configuration
//! from TOML files and command-line arguments.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tabletop_rules::Variant;
use tabletop_server::config::{
    DEFAULT_HISTORY_DEPTH, DEFAULT_SESSION_EXPIRY, DEFAULT_SWEEP_INTERVAL,
};
use tabletop_server::ServerConfig;
use tracing::info;

/// Upper bound on the undo depth a board may keep.
pub const MAX_HISTORY_DEPTH: usize = 1000;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Board lifetime and history settings
    #[serde(default)]
    pub sessions: SessionSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Network binding and hosted game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to listen on; the variant's usual port on all interfaces when unset
    #[serde(default)]
    pub bind_address: Option<String>,
    /// Game every board of this instance plays
    #[serde(default = "default_variant")]
    pub variant: Variant,
}

fn default_variant() -> Variant {
    Variant::Line
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: None,
            variant: default_variant(),
        }
    }
}

/// Board lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Seconds an unwatched board may stay idle before it is discarded
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,
    /// Seconds between two sweeps of idle boards
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Number of moves that can be taken back
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_expiry_secs() -> u64 {
    DEFAULT_SESSION_EXPIRY.as_secs()
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL.as_secs()
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            expiry_secs: default_expiry_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            history_depth: default_history_depth(),
        }
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the specified path
    /// and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading/creation failed.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// The address the server will listen on.
    pub fn bind_address(&self) -> Result<SocketAddr, String> {
        match &self.server.bind_address {
            Some(address) => address
                .parse()
                .map_err(|_| format!("Invalid bind address: {}", address)),
            None => Ok(ServerConfig::for_variant(self.server.variant).bind_address),
        }
    }

    /// Converts the application configuration to a server configuration.
    pub fn to_server_config(&self) -> anyhow::Result<ServerConfig> {
        let bind_address = self.bind_address().map_err(anyhow::Error::msg)?;
        Ok(ServerConfig {
            bind_address,
            variant: self.server.variant,
            session_expiry: Duration::from_secs(self.sessions.expiry_secs),
            sweep_interval: Duration::from_secs(self.sessions.sweep_interval_secs),
            history_depth: self.sessions.history_depth,
        })
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        self.bind_address()?;

        if self.sessions.expiry_secs == 0 {
            return Err("Session expiry must be at least one second".to_string());
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err("Sweep interval must be at least one second".to_string());
        }
        if self.sessions.history_depth == 0 || self.sessions.history_depth > MAX_HISTORY_DEPTH {
            return Err(format!(
                "History depth must be between 1 and {MAX_HISTORY_DEPTH}, got {}",
                self.sessions.history_depth
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
