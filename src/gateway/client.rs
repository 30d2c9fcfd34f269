//! HTTP gateway client implementation.
//!
//! Implements the GatewayClient trait against the Flink SQL Gateway v1 REST API.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::result_parser::{parse_result_str, ResultPage};
use super::{GatewayClient, OperationHandle, OperationStatus, Session};
use crate::config::GatewayConfig;
use crate::error::{Result, SqlGatewayError};

/// Path of the first result page, relative to the operation endpoint.
const FIRST_RESULT_PAGE: &str = "result/0";

/// Flink SQL Gateway client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    base_url: String,
    client: Client,
}

impl HttpGatewayClient {
    /// Creates a new client for the gateway described by `config`.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = config.gateway_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                SqlGatewayError::transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { base_url, client })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/sessions", self.base_url)
    }

    fn session_url(&self, session: &Session) -> String {
        format!("{}/v1/sessions/{}", self.base_url, session.handle())
    }

    fn operation_url(&self, session: &Session, operation: &OperationHandle) -> String {
        format!("{}/operations/{}", self.session_url(session), operation)
    }

    /// Resolves the URL of a result page.
    ///
    /// Continuations returned by the gateway are paths rooted at the server.
    fn result_url(
        &self,
        session: &Session,
        operation: &OperationHandle,
        next_result_uri: Option<&str>,
    ) -> String {
        match next_result_uri {
            Some(uri) if uri.starts_with("http://") || uri.starts_with("https://") => {
                uri.to_string()
            }
            Some(uri) => format!("{}/{}", self.base_url, uri.trim_start_matches('/')),
            None => format!(
                "{}/{}",
                self.operation_url(session, operation),
                FIRST_RESULT_PAGE
            ),
        }
    }

    /// Sends a request and returns the body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<String> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SqlGatewayError::transport(format!("{} {} timed out", method, url))
            } else if e.is_connect() {
                SqlGatewayError::transport(format!(
                    "Failed to connect to the SQL gateway at {}",
                    self.base_url
                ))
            } else {
                SqlGatewayError::transport(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SqlGatewayError::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SqlGatewayError::gateway(format!(
                "{} {} returned {}: {}",
                method, url, status, text
            )));
        }

        Ok(text)
    }

    async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(method, url, body).await?;
        serde_json::from_str(&text)
            .map_err(|e| SqlGatewayError::gateway(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn open_session(&self, session_name: &str) -> Result<Session> {
        let request = OpenSessionRequest { session_name };
        let response: OpenSessionResponse = self
            .send_json(Method::POST, &self.sessions_url(), Some(&request))
            .await?;
        Ok(Session::new(response.session_handle))
    }

    async fn close_session(&self, session: &Session) -> Result<()> {
        self.send::<()>(Method::DELETE, &self.session_url(session), None)
            .await?;
        Ok(())
    }

    async fn execute_statement(&self, session: &Session, sql: &str) -> Result<OperationHandle> {
        let request = ExecuteStatementRequest { statement: sql };
        let url = format!("{}/statements", self.session_url(session));
        let response: ExecuteStatementResponse =
            self.send_json(Method::POST, &url, Some(&request)).await?;
        Ok(OperationHandle::new(response.operation_handle))
    }

    async fn operation_status(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        let url = format!("{}/status", self.operation_url(session, operation));
        let response: StatusResponse = self.send_json::<(), _>(Method::GET, &url, None).await?;
        Ok(response.status)
    }

    async fn fetch_result(
        &self,
        session: &Session,
        operation: &OperationHandle,
        next_result_uri: Option<&str>,
    ) -> Result<ResultPage> {
        let url = self.result_url(session, operation, next_result_uri);
        let body = self.send::<()>(Method::GET, &url, None).await?;
        parse_result_str(&body)
    }

    async fn cancel_operation(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        let url = format!("{}/cancel", self.operation_url(session, operation));
        let response: StatusResponse = self.send_json::<(), _>(Method::POST, &url, None).await?;
        Ok(response.status)
    }

    async fn close_operation(
        &self,
        session: &Session,
        operation: &OperationHandle,
    ) -> Result<OperationStatus> {
        let url = format!("{}/close", self.operation_url(session, operation));
        let response: StatusResponse =
            self.send_json::<(), _>(Method::DELETE, &url, None).await?;
        Ok(response.status)
    }
}

// Gateway API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionRequest<'a> {
    session_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionResponse {
    session_handle: String,
}

#[derive(Debug, Serialize)]
struct ExecuteStatementRequest<'a> {
    statement: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteStatementResponse {
    operation_handle: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: OperationStatus,
}
