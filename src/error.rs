//! Error types for the Flink cursor.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

use crate::gateway::OperationStatus;

/// Main error type for gateway and cursor operations.
#[derive(Error, Debug)]
pub enum SqlGatewayError {
    /// The gateway answered with a non-success status or an unreadable body.
    #[error("SQL gateway error: {0}")]
    Gateway(String),

    /// The HTTP request could not be completed (host unreachable, timeout, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The submitted statement reached a terminal error status.
    #[error("Statement execution failed with status {status}")]
    ExecutionFailed { status: OperationStatus },

    /// A fetch completed without producing any result page.
    #[error("No result after fetch")]
    NoResult,

    /// Binding substitution failed (missing values for placeholders).
    #[error("Binding error: {0}")]
    Binding(String),

    /// Configuration errors (invalid config file, bad gateway address, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlGatewayError {
    /// Creates a gateway error with the given message.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an execution failure for the given terminal status.
    pub fn execution_failed(status: OperationStatus) -> Self {
        Self::ExecutionFailed { status }
    }

    /// Creates a binding error with the given message.
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Gateway(_) => "Gateway Error",
            Self::Transport(_) => "Transport Error",
            Self::ExecutionFailed { .. } => "Execution Error",
            Self::NoResult => "Result Error",
            Self::Binding(_) => "Binding Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using SqlGatewayError.
pub type Result<T> = std::result::Result<T, SqlGatewayError>;
