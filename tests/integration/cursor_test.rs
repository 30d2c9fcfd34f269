//! Cursor lifecycle tests through the public API.
//!
//! Uses the in-memory gateway so every scenario is deterministic.

use std::sync::Arc;

use flink_cursor::gateway::{
    MockGatewayClient, OperationHandle, OperationStatus, ResultPage, Row, RuntimeMode, Value,
};
use flink_cursor::{Cursor, FlinkHandler};
use pretty_assertions::assert_eq;

fn text_row(values: &[&str]) -> Row {
    values.iter().map(|v| Value::from(*v)).collect()
}

fn columns() -> Vec<String> {
    vec!["word".to_string()]
}

async fn open(client: MockGatewayClient) -> (Arc<MockGatewayClient>, FlinkHandler) {
    let client = Arc::new(client);
    let handler = FlinkHandler::open(client.clone(), "integration")
        .await
        .unwrap();
    (client, handler)
}

#[tokio::test]
async fn test_one_shot_statement_returns_all_rows() {
    let (client, handler) = open(MockGatewayClient::new().with_page(ResultPage::end_of_stream(
        columns(),
        vec![text_row(&["hello"]), text_row(&["world"])],
    )))
    .await;
    let mut cursor = handler.cursor();

    cursor.execute("SELECT word FROM words", None).await.unwrap();
    let rows = cursor.fetchall().await.unwrap();

    assert_eq!(rows, vec![text_row(&["hello"]), text_row(&["world"])]);
    assert!(client.closed_operations().is_empty());
    assert_eq!(cursor.buffered_rows(), 0);
    assert!(!cursor.has_live_operation());
}

#[tokio::test]
async fn test_continuous_statement_with_fetch_max_releases_operation() {
    let (client, handler) = open(MockGatewayClient::new().with_page(ResultPage::payload(
        columns(),
        vec![text_row(&["a"]), text_row(&["b"]), text_row(&["c"])],
        "/v1/sessions/s/operations/o/result/1",
    )))
    .await;
    let mut cursor = handler.cursor();

    cursor
        .execute(
            "/** mode('streaming') fetch_max(1) */ SELECT word FROM words",
            None,
        )
        .await
        .unwrap();
    let rows = cursor.fetchall().await.unwrap();

    assert_eq!(rows, vec![text_row(&["a"])]);
    assert_eq!(client.closed_operations(), vec![OperationHandle::new("op-2")]);
    assert_eq!(cursor.buffered_rows(), 0);
}

#[tokio::test]
async fn test_runtime_mode_persists_on_session() {
    let (client, handler) = open(MockGatewayClient::new()).await;
    let mut cursor = handler.cursor();

    cursor
        .execute("/** mode('streaming') */ SELECT 1", None)
        .await
        .unwrap();
    cursor.fetchall().await.unwrap();
    assert_eq!(handler.session().runtime_mode(), Some(RuntimeMode::Streaming));

    cursor.execute("SELECT 2", None).await.unwrap();
    cursor.fetchall().await.unwrap();
    assert_eq!(handler.session().runtime_mode(), Some(RuntimeMode::Batch));

    let sets: Vec<String> = client
        .submitted_statements()
        .into_iter()
        .filter(|s| s.starts_with("SET"))
        .collect();
    assert_eq!(
        sets,
        vec![
            "SET 'execution.runtime-mode' = 'streaming'".to_string(),
            "SET 'execution.runtime-mode' = 'batch'".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_status_before_and_after_execute() {
    let (_client, handler) = open(MockGatewayClient::new()).await;
    let mut cursor: Cursor = handler.cursor();

    assert_eq!(cursor.status().await.unwrap(), OperationStatus::Unknown);

    cursor.execute("SELECT 1", None).await.unwrap();
    assert_eq!(cursor.status().await.unwrap(), OperationStatus::Finished);

    cursor.fetchall().await.unwrap();
    assert_eq!(cursor.status().await.unwrap(), OperationStatus::Unknown);
}

#[tokio::test]
async fn test_fetchone_exhaustion_resets_cursor() {
    let (_client, handler) = open(MockGatewayClient::new().with_page(ResultPage::end_of_stream(
        columns(),
        vec![text_row(&["only"])],
    )))
    .await;
    let mut cursor = handler.cursor();

    cursor.execute("SELECT word FROM words", None).await.unwrap();

    assert_eq!(cursor.fetchone().await.unwrap(), Some(text_row(&["only"])));
    assert_eq!(cursor.fetchone().await.unwrap(), None);
    assert!(!cursor.has_live_operation());
    assert!(!cursor.has_result_page());

    // Exhaustion is sticky until the next execute.
    assert_eq!(cursor.fetchone().await.unwrap(), None);
}

#[tokio::test]
async fn test_continuous_test_query_collapses_to_last_row() {
    let (_client, handler) = open(MockGatewayClient::new().with_page(ResultPage::end_of_stream(
        vec!["n".to_string(), "a".to_string(), "b".to_string()],
        vec![
            vec![Value::Int(1), Value::Bool(true), Value::Bool(false)],
            vec![Value::Int(2), Value::Bool(true), Value::Bool(true)],
        ],
    )))
    .await;
    let mut cursor = handler.cursor();

    cursor
        .execute(
            "/** mode('streaming') test_query('true') */ SELECT n, a, b FROM probe",
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        cursor.fetchall().await.unwrap(),
        vec![vec![Value::Int(2), Value::Bool(true), Value::Bool(true)]]
    );
}
