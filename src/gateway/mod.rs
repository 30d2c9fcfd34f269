//! Flink SQL Gateway abstraction layer.
//!
//! Provides a trait-based interface over the gateway's REST surface so the
//! cursor can run against the real HTTP client or an in-memory mock.

mod client;
mod mock;
mod operation;
mod result_parser;
mod session;
mod types;

pub use client::HttpGatewayClient;
pub use mock::MockGatewayClient;
pub use operation::Operation;
pub use result_parser::{parse_result, parse_result_str, ResultPage};
pub use session::{RuntimeMode, Session};
pub use types::{ColumnInfo, OperationStatus, ResultKind, Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Opaque handle identifying one submitted statement on the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationHandle(String);

impl OperationHandle {
    /// Wraps a handle string returned by the gateway.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait defining the interface for SQL gateway clients.
///
/// All operations are async and return Results with SqlGatewayError.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Opens a named session.
    async fn open_session(&self, session_name: &str) -> Result<Session>;

    /// Closes a session and every operation still attached to it.
    async fn close_session(&self, session: &Session) -> Result<()>;

    /// Submits a statement and returns the handle of the resulting operation.
    async fn execute_statement(&self, session: &Session, sql: &str) -> Result<OperationHandle>;

    /// Probes the current status of an operation.
    async fn operation_status(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus>;

    /// Fetches one result page.
    ///
    /// `next_result_uri` is the continuation from the previous page, or `None`
    /// for the first page.
    async fn fetch_result(
        &self,
        session: &Session,
        operation: &OperationHandle,
        next_result_uri: Option<&str>,
    ) -> Result<ResultPage>;

    /// Requests cancellation of a running operation.
    async fn cancel_operation(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus>;

    /// Releases an operation and its result resources.
    async fn close_operation(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus>;
}
