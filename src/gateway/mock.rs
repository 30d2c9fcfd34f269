//! Mock gateway client for testing.
//!
//! Serves scripted statuses and result pages from memory and records every
//! call so tests can assert on the traffic a cursor produced.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    GatewayClient, OperationHandle, OperationStatus, ResultPage, Session, Value,
};
use crate::error::{Result, SqlGatewayError};

#[derive(Debug, Default)]
struct MockState {
    statuses: VecDeque<OperationStatus>,
    pages: VecDeque<ResultPage>,
    statements: HashMap<OperationHandle, String>,
    submitted: Vec<String>,
    fetch_requests: Vec<Option<String>>,
    status_probes: usize,
    closed: Vec<OperationHandle>,
    canceled: Vec<OperationHandle>,
    next_operation: usize,
}

/// A mock gateway client that returns predefined results.
///
/// Status probes consume the scripted status sequence and report `FINISHED`
/// once it is exhausted. Page fetches consume the scripted pages; without any
/// scripted pages a single end-of-stream page echoing the statement is served.
#[derive(Debug, Default)]
pub struct MockGatewayClient {
    state: Mutex<MockState>,
    fail_session: bool,
}

impl MockGatewayClient {
    /// Creates a new mock client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the statuses returned by successive status probes.
    pub fn with_status_sequence(self, statuses: Vec<OperationStatus>) -> Self {
        self.lock().statuses.extend(statuses);
        self
    }

    /// Appends one page to the scripted page sequence.
    pub fn with_page(self, page: ResultPage) -> Self {
        self.lock().pages.push_back(page);
        self
    }

    /// Makes session creation fail as a non-success gateway response would.
    pub fn with_failing_session(mut self) -> Self {
        self.fail_session = true;
        self
    }

    /// Returns every statement submitted so far, in order.
    pub fn submitted_statements(&self) -> Vec<String> {
        self.lock().submitted.clone()
    }

    /// Returns the continuation passed to every page fetch, in order.
    pub fn fetch_requests(&self) -> Vec<Option<String>> {
        self.lock().fetch_requests.clone()
    }

    /// Returns the number of status probes served.
    pub fn status_probes(&self) -> usize {
        self.lock().status_probes
    }

    /// Returns the operations released through `close_operation`.
    pub fn closed_operations(&self) -> Vec<OperationHandle> {
        self.lock().closed.clone()
    }

    /// Returns the operations canceled through `cancel_operation`.
    pub fn canceled_operations(&self) -> Vec<OperationHandle> {
        self.lock().canceled.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn open_session(&self, session_name: &str) -> Result<Session> {
        if self.fail_session {
            return Err(SqlGatewayError::gateway(
                "POST /v1/sessions returned 500 Internal Server Error",
            ));
        }
        Ok(Session::new(format!("mock-session-{session_name}")))
    }

    async fn close_session(&self, _session: &Session) -> Result<()> {
        Ok(())
    }

    async fn execute_statement(&self, _session: &Session, sql: &str) -> Result<OperationHandle> {
        let mut state = self.lock();
        state.next_operation += 1;
        let handle = OperationHandle::new(format!("op-{}", state.next_operation));
        state.submitted.push(sql.to_string());
        state.statements.insert(handle.clone(), sql.to_string());
        Ok(handle)
    }

    async fn operation_status(
        &self,
        _session: &Session,
        _operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        let mut state = self.lock();
        state.status_probes += 1;
        Ok(state
            .statuses
            .pop_front()
            .unwrap_or(OperationStatus::Finished))
    }

    async fn fetch_result(
        &self,
        _session: &Session,
        operation: &OperationHandle,
        next_result_uri: Option<&str>,
    ) -> Result<ResultPage> {
        let mut state = self.lock();
        state.fetch_requests.push(next_result_uri.map(String::from));

        if let Some(page) = state.pages.pop_front() {
            return Ok(page);
        }

        let sql = state.statements.get(operation).cloned().unwrap_or_default();
        Ok(ResultPage::end_of_stream(
            vec!["result".to_string()],
            vec![vec![Value::String(format!("Mock result for: {}", sql))]],
        ))
    }

    async fn cancel_operation(
        &self,
        _session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        self.lock().canceled.push(operation.clone());
        Ok(OperationStatus::Canceled)
    }

    async fn close_operation(
        &self,
        _session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        self.lock().closed.push(operation.clone());
        Ok(OperationStatus::Closed)
    }
}
