//! Session-scoped entry point handing out cursors.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::cursor::{Cursor, DEFAULT_FETCH_INTERVAL};
use crate::error::Result;
use crate::gateway::{GatewayClient, HttpGatewayClient, Session};

/// Owns one gateway session and creates cursors bound to it.
///
/// Every cursor created here shares the session, including its runtime mode,
/// so statements from different cursors must be issued one after another.
pub struct FlinkHandler {
    client: Arc<dyn GatewayClient>,
    session: Arc<Session>,
    fetch_interval: Duration,
}

impl FlinkHandler {
    /// Opens a session named `session_name` through `client`.
    pub async fn open(client: Arc<dyn GatewayClient>, session_name: &str) -> Result<Self> {
        let session = client.open_session(session_name).await?;
        info!("Opened {} ({})", session, session_name);
        Ok(Self {
            client,
            session: Arc::new(session),
            fetch_interval: DEFAULT_FETCH_INTERVAL,
        })
    }

    /// Connects to the gateway described by `config` over HTTP.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(HttpGatewayClient::new(&config.gateway)?);
        Ok(Self::open(client, &config.gateway.session_name)
            .await?
            .with_fetch_interval(config.cursor.fetch_interval()))
    }

    /// Sets the poll interval given to new cursors.
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    /// Returns the shared session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Creates a cursor bound to this handler's session.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.client.clone(), self.session.clone())
            .with_fetch_interval(self.fetch_interval)
    }

    /// Closes the session on the gateway.
    pub async fn close(self) -> Result<()> {
        info!("Closing {}", self.session);
        self.client.close_session(&self.session).await
    }
}
