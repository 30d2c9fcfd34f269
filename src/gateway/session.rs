//! Gateway sessions and their runtime-mode state.

use std::fmt;
use std::sync::Mutex;

use tracing::info;

use super::GatewayClient;
use crate::error::Result;

/// Runtime mode configured on a session through `execution.runtime-mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeMode {
    /// Bounded, one-shot execution (`batch`).
    Batch,
    /// Unbounded, continuous execution (`streaming`).
    Streaming,
}

impl RuntimeMode {
    /// Returns the value understood by `execution.runtime-mode`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Streaming => "streaming",
        }
    }

    /// Parses a runtime mode name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "batch" => Some(Self::Batch),
            "streaming" => Some(Self::Streaming),
            _ => None,
        }
    }

    /// Returns the statement that switches a session to this mode.
    pub fn set_statement(&self) -> String {
        format!("SET 'execution.runtime-mode' = '{}'", self.as_str())
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open session on the gateway.
///
/// The runtime mode is session-scoped: once set it applies to every later
/// statement submitted on the session, from any cursor, until it is set again.
#[derive(Debug)]
pub struct Session {
    handle: String,
    runtime_mode: Mutex<Option<RuntimeMode>>,
}

impl Session {
    /// Wraps a session handle returned by the gateway.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            runtime_mode: Mutex::new(None),
        }
    }

    /// Returns the opaque session handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Returns the runtime mode last set through [`Session::set_runtime_mode`].
    pub fn runtime_mode(&self) -> Option<RuntimeMode> {
        *self
            .runtime_mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issues the `SET 'execution.runtime-mode'` statement and records the mode.
    ///
    /// The statement is submitted every time, even when the recorded mode
    /// already matches, since other clients of the same session may have
    /// changed it.
    pub async fn set_runtime_mode(
        &self,
        client: &dyn GatewayClient,
        mode: RuntimeMode,
    ) -> Result<()> {
        info!("Setting 'execution.runtime-mode' to '{}'", mode);
        client.execute_statement(self, &mode.set_statement()).await?;
        *self
            .runtime_mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(mode);
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.handle)
    }
}
