//! Tests against a running Flink SQL Gateway.
//!
//! Skipped unless FLINK_GATEWAY_URL is set.

use std::sync::Arc;
use std::time::Duration;

use flink_cursor::config::GatewayConfig;
use flink_cursor::gateway::{HttpGatewayClient, Value};
use flink_cursor::FlinkHandler;
use url::Url;

/// Helper to build a handler from FLINK_GATEWAY_URL.
async fn get_test_handler() -> Option<FlinkHandler> {
    let url = Url::parse(&std::env::var("FLINK_GATEWAY_URL").ok()?).ok()?;
    let config = GatewayConfig {
        host: url.host_str()?.to_string(),
        port: url.port().unwrap_or(8083),
        session_name: "flink-cursor-tests".to_string(),
        ..Default::default()
    };
    let client = Arc::new(HttpGatewayClient::new(&config).ok()?);
    FlinkHandler::open(client, &config.session_name)
        .await
        .ok()
        .map(|h| h.with_fetch_interval(Duration::from_millis(50)))
}

#[tokio::test]
async fn test_live_select_literal() {
    let Some(handler) = get_test_handler().await else {
        eprintln!("Skipping test: FLINK_GATEWAY_URL not set");
        return;
    };
    let mut cursor = handler.cursor();

    cursor
        .execute("SELECT {} AS n, {} AS s", Some(&[Value::Int(1), Value::from("x")]))
        .await
        .unwrap();
    let description = cursor.description().await.unwrap();
    let rows = cursor.fetchall().await.unwrap();

    assert_eq!(description.len(), 2);
    assert_eq!(description[0].name, "n");
    assert_eq!(rows, vec![vec![Value::Int(1), Value::String("x".to_string())]]);

    handler.close().await.unwrap();
}

#[tokio::test]
async fn test_live_invalid_statement_fails() {
    let Some(handler) = get_test_handler().await else {
        eprintln!("Skipping test: FLINK_GATEWAY_URL not set");
        return;
    };
    let mut cursor = handler.cursor();

    let err = cursor
        .execute("SELECT * FROM table_that_does_not_exist", None)
        .await
        .unwrap_err();
    // Validation failures surface either as a rejected submission or as an
    // operation that ends in ERROR, depending on the gateway version.
    assert!(matches!(
        err.category(),
        "Execution Error" | "Gateway Error"
    ));

    handler.close().await.unwrap();
}
