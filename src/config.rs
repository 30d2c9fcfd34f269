//! Configuration management for the Flink cursor.
//!
//! Handles loading configuration from TOML files and environment variables
//! for the gateway address, session naming and cursor polling.

use crate::error::{Result, SqlGatewayError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// SQL gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Cursor polling settings.
    #[serde(default)]
    pub cursor: CursorConfig,
}

/// SQL gateway connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Gateway REST port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name given to sessions opened by this client.
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_session_name() -> String {
    "flink-cursor".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_name: default_session_name(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Returns the gateway base URL, e.g. `http://localhost:8083`.
    pub fn gateway_url(&self) -> Result<String> {
        let raw = format!("http://{}:{}", self.host, self.port);
        let url = Url::parse(&raw)
            .map_err(|e| SqlGatewayError::config(format!("Invalid gateway address '{raw}': {e}")))?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(SqlGatewayError::config(format!(
                "Invalid gateway address '{raw}': missing host"
            )));
        }

        Ok(raw)
    }

    /// Applies `FLINK_GATEWAY_HOST`, `FLINK_GATEWAY_PORT` and
    /// `FLINK_GATEWAY_SESSION` when they are set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("FLINK_GATEWAY_HOST") {
            self.host = host;
        }
        if let Ok(port_str) = std::env::var("FLINK_GATEWAY_PORT") {
            self.port = port_str.parse().map_err(|_| {
                SqlGatewayError::config(format!("Invalid FLINK_GATEWAY_PORT '{port_str}'"))
            })?;
        }
        if let Ok(session_name) = std::env::var("FLINK_GATEWAY_SESSION") {
            self.session_name = session_name;
        }
        Ok(())
    }

    /// Returns a display string for logs and UI purposes.
    pub fn display_string(&self) -> String {
        format!("{} @ {}:{}", self.session_name, self.host, self.port)
    }
}

/// Cursor polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Interval between status probes and between page fetches, in milliseconds.
    #[serde(default = "default_fetch_interval_ms")]
    pub fetch_interval_ms: u64,
}

fn default_fetch_interval_ms() -> u64 {
    100
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            fetch_interval_ms: default_fetch_interval_ms(),
        }
    }
}

impl CursorConfig {
    /// Returns the poll interval as a duration.
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flink-cursor")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file, or defaults when it does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SqlGatewayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SqlGatewayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
