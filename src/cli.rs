//! Command-line argument parsing for `flink-sql`.

use clap::Parser;
use flink_cursor::config::GatewayConfig;
use flink_cursor::gateway::Value;
use flink_cursor::{Result, SqlGatewayError};
use std::path::PathBuf;

/// Run a SQL statement through the Flink SQL Gateway and print its rows.
#[derive(Parser, Debug)]
#[command(name = "flink-sql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQL statement to execute (use {} for bindings)
    #[arg(value_name = "SQL")]
    pub sql: Option<String>,

    /// Read the statement from a file instead
    #[arg(short = 'f', long, value_name = "PATH", conflicts_with = "sql")]
    pub file: Option<PathBuf>,

    /// Binding value for the next {} placeholder (repeatable)
    #[arg(short = 'b', long = "bind", value_name = "VALUE")]
    pub bindings: Vec<String>,

    /// Gateway host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Gateway REST port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Session name
    #[arg(short = 's', long, value_name = "NAME")]
    pub session_name: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print rows one at a time as they are fetched
    #[arg(long)]
    pub fetch_one: bool,

    /// Use the in-memory mock gateway (for testing)
    #[arg(long)]
    pub mock: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path (from CLI or default).
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(flink_cursor::config::Config::default_path)
    }

    /// Applies gateway overrides given on the command line.
    pub fn apply_overrides(&self, gateway: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            gateway.host = host.clone();
        }
        if let Some(port) = self.port {
            gateway.port = port;
        }
        if let Some(session_name) = &self.session_name {
            gateway.session_name = session_name.clone();
        }
    }

    /// Returns the statement text from the argument or the file.
    pub fn statement(&self) -> Result<String> {
        if let Some(sql) = &self.sql {
            return Ok(sql.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|e| {
                SqlGatewayError::config(format!("Failed to read {}: {e}", path.display()))
            });
        }
        Err(SqlGatewayError::config(
            "No statement given. Pass SQL as an argument or use --file",
        ))
    }

    /// Returns the typed binding values, or `None` when no bindings were given.
    pub fn binding_values(&self) -> Option<Vec<Value>> {
        if self.bindings.is_empty() {
            return None;
        }
        Some(self.bindings.iter().map(|b| parse_binding(b)).collect())
    }
}

/// Interprets a command-line binding as the narrowest matching value.
///
/// `null`, booleans, integers and floats are recognized; a
/// `YYYY-MM-DD HH:MM:SS` value becomes a timestamp; anything else is a string.
fn parse_binding(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Value::Timestamp(ts);
    }
    Value::String(raw.to_string())
}
