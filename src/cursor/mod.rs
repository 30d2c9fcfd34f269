//! Pull-based cursor over the SQL gateway.
//!
//! A cursor drives one statement at a time through its lifecycle: runtime
//! mode selection, submission, completion polling and page-by-page retrieval.
//! A retrieval cycle starts with [`Cursor::execute`] and ends with
//! [`Cursor::fetchall`] or with a [`Cursor::fetchone`] call that reports
//! exhaustion; at that point the buffer, the page, the row counter and the
//! live operation are cleared together.

mod bindings;
mod hints;

pub use bindings::{render_binding, substitute_bindings};
pub use hints::{QueryHints, QueryMode};

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, SqlGatewayError};
use crate::gateway::{
    ColumnInfo, GatewayClient, Operation, OperationStatus, ResultPage, Row, Session, Value,
};

/// Default interval between status probes and between page fetches.
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_millis(100);

/// Row returned for a continuous test query that buffered nothing.
fn empty_test_query_row() -> Row {
    vec![Value::Int(0), Value::Bool(false), Value::Bool(false)]
}

/// Cursor bound to one gateway session.
///
/// Not meant to be shared: every method takes `&mut self` and the cursor holds
/// at most one live operation.
pub struct Cursor {
    client: Arc<dyn GatewayClient>,
    session: Arc<Session>,
    fetch_interval: Duration,

    last_operation: Option<Operation>,
    result_buffer: VecDeque<Row>,
    buffered_results_counter: u64,
    last_result: Option<ResultPage>,
    last_query_hints: QueryHints,
    last_query_start_time: Option<Instant>,
}

impl Cursor {
    /// Creates a cursor that submits statements on `session`.
    pub fn new(client: Arc<dyn GatewayClient>, session: Arc<Session>) -> Self {
        info!("Creating new cursor for {}", session);
        Self {
            client,
            session,
            fetch_interval: DEFAULT_FETCH_INTERVAL,
            last_operation: None,
            result_buffer: VecDeque::new(),
            buffered_results_counter: 0,
            last_result: None,
            last_query_hints: QueryHints::default(),
            last_query_start_time: None,
        }
    }

    /// Sets the interval used by the completion poll and the retrieval loop.
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    /// Returns the session this cursor submits to.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Returns the hints of the most recently executed statement.
    pub fn hints(&self) -> &QueryHints {
        &self.last_query_hints
    }

    /// Returns the number of rows currently buffered.
    pub fn buffered_rows(&self) -> usize {
        self.result_buffer.len()
    }

    /// Returns true while a submitted operation belongs to this cursor.
    pub fn has_live_operation(&self) -> bool {
        self.last_operation.is_some()
    }

    /// Returns true once a page has been fetched in the current cycle.
    pub fn has_result_page(&self) -> bool {
        self.last_result.is_some()
    }

    /// Submits a statement and waits for it to finish.
    ///
    /// `{}` placeholders in `sql` are replaced by `bindings` first. Before
    /// submission the session's runtime mode is set from the statement's
    /// hints; that setting stays in effect for later statements on the same
    /// session. A continuous operation left over from an unfinished cycle is
    /// released first. Waiting for completion has no deadline.
    pub async fn execute(&mut self, sql: &str, bindings: Option<&[Value]>) -> Result<()> {
        debug!("Preparing statement \"{}\"", sql);
        let sql = match bindings {
            Some(bindings) => substitute_bindings(sql, bindings)?,
            None => sql.to_string(),
        };

        info!("Executing statement \"{}\"", sql);
        let released = self.release_continuous_operation().await;
        self.clean();
        released?;

        self.last_query_hints = QueryHints::parse(&sql);
        self.session
            .set_runtime_mode(self.client.as_ref(), self.last_query_hints.runtime_mode())
            .await?;
        self.last_query_start_time = Some(Instant::now());

        let handle = self.client.execute_statement(&self.session, &sql).await?;
        let operation = self.last_operation.insert(Operation::new(handle));

        let status = operation
            .wait_till_finished(self.client.as_ref(), &self.session, self.fetch_interval)
            .await?;
        info!(
            "Statement executed. Status {}, operation handle: {}",
            status,
            operation.handle()
        );

        if status == OperationStatus::Error {
            return Err(SqlGatewayError::execution_failed(status));
        }
        Ok(())
    }

    /// Retrieves every remaining row and ends the cycle.
    ///
    /// Retrieval stops at end-of-stream, once `fetch_max` rows are buffered, or
    /// once `fetch_timeout_ms` has elapsed since submission, whichever comes
    /// first.
    pub async fn fetchall(&mut self) -> Result<Vec<Row>> {
        if self.last_result.is_none() {
            self.buffer_results().await?;
        }

        while !self.retrieval_complete()? {
            tokio::time::sleep(self.fetch_interval).await;
            self.buffer_results().await?;
        }

        let mut result: Vec<Row> = self.result_buffer.drain(..).collect();
        info!("Fetched {} rows from the gateway", result.len());

        if self.last_query_hints.test_query {
            result = self.handle_test_query(result);
        }

        let released = self.release_continuous_operation().await;
        self.clean();
        released?;

        debug!("Returned {} rows", result.len());
        Ok(result)
    }

    /// Returns the next row, fetching at most one further page.
    ///
    /// `None` signals exhaustion and ends the cycle; a continuous operation is
    /// released at that point.
    pub async fn fetchone(&mut self) -> Result<Option<Row>> {
        if let Some(row) = self.result_buffer.pop_front() {
            return Ok(Some(row));
        }

        let more_pages = self
            .last_result
            .as_ref()
            .map_or(true, |page| !page.is_end_of_stream);

        if more_pages && self.last_operation.is_some() {
            self.buffer_results().await?;
            if let Some(row) = self.result_buffer.pop_front() {
                return Ok(Some(row));
            }
        }

        let released = self.release_continuous_operation().await;
        self.clean();
        released?;
        Ok(None)
    }

    /// Returns the columns of the current page, fetching the first page if needed.
    pub async fn description(&mut self) -> Result<Vec<ColumnInfo>> {
        if self.last_result.is_none() {
            self.buffer_results().await?;
        }

        let page = self.last_result.as_ref().ok_or(SqlGatewayError::NoResult)?;
        Ok(page
            .column_names
            .iter()
            .map(|name| ColumnInfo::new(name.clone()))
            .collect())
    }

    /// Returns the status of the live operation, probing the gateway.
    ///
    /// Reports `Unknown` when no operation belongs to the cursor.
    pub async fn status(&mut self) -> Result<OperationStatus> {
        match self.last_operation.as_mut() {
            Some(operation) => operation.status(self.client.as_ref(), &self.session).await,
            None => Ok(OperationStatus::Unknown),
        }
    }

    /// Cancels the live operation, if any, and ends the cycle.
    pub async fn cancel(&mut self) -> Result<()> {
        if let Some(operation) = self.last_operation.as_mut() {
            info!("Canceling operation {}", operation.handle());
            let canceled = operation.cancel(self.client.as_ref(), &self.session).await;
            self.clean();
            canceled?;
        }
        Ok(())
    }

    /// Releases the live operation, if any, and ends the cycle.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(operation) = self.last_operation.as_mut() {
            let closed = operation.close(self.client.as_ref(), &self.session).await;
            self.clean();
            closed?;
        }
        Ok(())
    }

    /// Fetches the next page and appends its rows to the buffer.
    async fn buffer_results(&mut self) -> Result<()> {
        let operation = self.last_operation.as_ref().ok_or(SqlGatewayError::NoResult)?;
        let next_page = self
            .last_result
            .as_ref()
            .and_then(|page| page.next_result_uri.as_deref());

        let result = operation
            .result(self.client.as_ref(), &self.session, next_page)
            .await?;

        for row in &result.rows {
            if self.buffered_fetch_max() {
                info!("Reached fetch max record");
                break;
            }
            self.buffered_results_counter += 1;
            self.result_buffer.push_back(row.clone());
        }
        info!("Buffered: {} rows", result.rows.len());

        self.last_result = Some(result);
        Ok(())
    }

    fn retrieval_complete(&self) -> Result<bool> {
        let page = self.last_result.as_ref().ok_or(SqlGatewayError::NoResult)?;
        Ok(page.is_end_of_stream || self.buffered_fetch_max() || self.exceeded_timeout())
    }

    fn buffered_fetch_max(&self) -> bool {
        self.last_query_hints
            .fetch_max
            .is_some_and(|max| self.buffered_results_counter >= max)
    }

    fn exceeded_timeout(&self) -> bool {
        match (self.last_query_hints.fetch_timeout_ms, self.last_query_start_time) {
            (Some(timeout_ms), Some(started)) => {
                started.elapsed() > Duration::from_millis(timeout_ms)
            }
            _ => false,
        }
    }

    /// Collapses a continuous test query's output to its last row.
    fn handle_test_query(&self, mut result: Vec<Row>) -> Vec<Row> {
        if !self.last_query_hints.is_continuous() {
            return result;
        }
        match result.pop() {
            Some(last) => vec![last],
            None => vec![empty_test_query_row()],
        }
    }

    /// Continuous operations keep running until released; one-shot ones are left open.
    async fn release_continuous_operation(&mut self) -> Result<()> {
        if !self.last_query_hints.is_continuous() {
            return Ok(());
        }
        match self.last_operation.as_mut() {
            Some(operation) => operation.close(self.client.as_ref(), &self.session).await,
            None => Ok(()),
        }
    }

    fn clean(&mut self) {
        self.result_buffer.clear();
        self.last_result = None;
        self.last_operation = None;
        self.buffered_results_counter = 0;
    }
}
