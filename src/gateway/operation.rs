//! A submitted statement and its last observed status.

use std::time::Duration;

use tracing::debug;

use super::{GatewayClient, OperationHandle, OperationStatus, ResultPage, Session};
use crate::error::Result;

/// One statement submitted on a session.
#[derive(Debug, Clone)]
pub struct Operation {
    handle: OperationHandle,
    last_status: OperationStatus,
}

impl Operation {
    /// Creates an operation for a freshly submitted statement.
    pub fn new(handle: OperationHandle) -> Self {
        Self {
            handle,
            last_status: OperationStatus::Running,
        }
    }

    /// Returns the operation handle.
    pub fn handle(&self) -> &OperationHandle {
        &self.handle
    }

    /// Returns the status observed by the most recent probe.
    pub fn last_status(&self) -> OperationStatus {
        self.last_status
    }

    /// Probes the gateway for the current status and remembers it.
    pub async fn status(
        &mut self,
        client: &dyn GatewayClient,
        session: &Session,
    ) -> Result<OperationStatus> {
        let status = client.operation_status(session, &self.handle).await?;
        debug!("Operation {} status: {}", self.handle, status);
        self.last_status = status;
        Ok(status)
    }

    /// Re-checks the status every `interval` until it is terminal.
    ///
    /// There is no deadline: an operation that never leaves a running state
    /// blocks the caller indefinitely.
    pub async fn wait_till_finished(
        &mut self,
        client: &dyn GatewayClient,
        session: &Session,
        interval: Duration,
    ) -> Result<OperationStatus> {
        let mut status = self.status(client, session).await?;
        while status.is_running() {
            tokio::time::sleep(interval).await;
            status = self.status(client, session).await?;
        }
        Ok(status)
    }

    /// Fetches the page identified by `next_result_uri` (the first page when `None`).
    pub async fn result(
        &self,
        client: &dyn GatewayClient,
        session: &Session,
        next_result_uri: Option<&str>,
    ) -> Result<ResultPage> {
        client
            .fetch_result(session, &self.handle, next_result_uri)
            .await
    }

    /// Releases the operation on the gateway.
    pub async fn close(&mut self, client: &dyn GatewayClient, session: &Session) -> Result<()> {
        self.last_status = client.close_operation(session, &self.handle).await?;
        Ok(())
    }

    /// Asks the gateway to cancel the operation.
    pub async fn cancel(&mut self, client: &dyn GatewayClient, session: &Session) -> Result<()> {
        self.last_status = client.cancel_operation(session, &self.handle).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGatewayClient;

    #[tokio::test(start_paused = true)]
    async fn test_wait_till_finished_polls_until_terminal() {
        let client = MockGatewayClient::new().with_status_sequence(vec![
            OperationStatus::Running,
            OperationStatus::Running,
            OperationStatus::Finished,
        ]);
        let session = Session::new("s");
        let handle = client.execute_statement(&session, "SELECT 1").await.unwrap();
        let mut operation = Operation::new(handle);

        let status = operation
            .wait_till_finished(&client, &session, Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(status, OperationStatus::Finished);
        assert_eq!(operation.last_status(), OperationStatus::Finished);
        assert_eq!(client.status_probes(), 3);
    }

    #[tokio::test]
    async fn test_close_records_closed_status() {
        let client = MockGatewayClient::new();
        let session = Session::new("s");
        let handle = client.execute_statement(&session, "SELECT 1").await.unwrap();
        let mut operation = Operation::new(handle.clone());

        operation.close(&client, &session).await.unwrap();

        assert_eq!(operation.last_status(), OperationStatus::Closed);
        assert_eq!(client.closed_operations(), vec![handle]);
    }
}
