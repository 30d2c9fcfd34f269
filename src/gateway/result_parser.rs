//! Decoding of paginated result responses.
//!
//! The gateway returns one JSON object per page. Records carry their field
//! values positionally; the column order comes from the descriptor list that
//! accompanies them on the same page.

use serde::Deserialize;

use super::types::{ColumnInfo, ResultKind, Row, Value};
use crate::error::{Result, SqlGatewayError};

/// One decoded page of statement output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    /// Ordered column names.
    pub column_names: Vec<String>,
    /// Ordered rows, each aligned with `column_names`.
    pub rows: Vec<Row>,
    /// Continuation identifying the next page; absent at end-of-stream.
    pub next_result_uri: Option<String>,
    /// True when no further pages exist.
    pub is_end_of_stream: bool,
}

impl ResultPage {
    /// Creates a page that carries rows and a continuation to the next page.
    pub fn payload(
        column_names: Vec<String>,
        rows: Vec<Row>,
        next_result_uri: impl Into<String>,
    ) -> Self {
        Self {
            column_names,
            rows,
            next_result_uri: Some(next_result_uri.into()),
            is_end_of_stream: false,
        }
    }

    /// Creates a terminal page.
    pub fn end_of_stream(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            column_names,
            rows,
            next_result_uri: None,
            is_end_of_stream: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResultResponse {
    result_type: ResultKind,
    #[serde(default)]
    next_result_uri: Option<String>,
    #[serde(default)]
    results: RawResults,
}

#[derive(Debug, Default, Deserialize)]
struct RawResults {
    #[serde(default)]
    columns: Vec<ColumnInfo>,
    #[serde(default)]
    data: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    fields: Vec<serde_json::Value>,
}

/// Decodes a raw JSON page into a [`ResultPage`].
pub fn parse_result(data: serde_json::Value) -> Result<ResultPage> {
    let raw: RawResultResponse = serde_json::from_value(data)
        .map_err(|e| SqlGatewayError::gateway(format!("Failed to parse result page: {e}")))?;
    Ok(decode(raw))
}

/// Decodes a raw page body.
pub fn parse_result_str(body: &str) -> Result<ResultPage> {
    let raw: RawResultResponse = serde_json::from_str(body)
        .map_err(|e| SqlGatewayError::gateway(format!("Failed to parse result page: {e}")))?;
    Ok(decode(raw))
}

fn decode(raw: RawResultResponse) -> ResultPage {
    let column_names: Vec<String> = raw.results.columns.into_iter().map(|c| c.name).collect();
    let is_end_of_stream = raw.result_type == ResultKind::Eos;

    let width = column_names.len();
    let rows = raw
        .results
        .data
        .into_iter()
        .map(|record| {
            record
                .fields
                .into_iter()
                .take(width)
                .map(Value::from)
                .collect()
        })
        .collect();

    ResultPage {
        column_names,
        rows,
        next_result_uri: if is_end_of_stream {
            None
        } else {
            raw.next_result_uri
        },
        is_end_of_stream,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_page() {
        let page = parse_result(json!({
            "resultType": "PAYLOAD",
            "nextResultUri": "/v1/sessions/s/operations/o/result/1",
            "results": {
                "columns": [
                    {"name": "id", "logicalType": {"type": "INTEGER"}},
                    {"name": "name", "logicalType": {"type": "VARCHAR"}}
                ],
                "data": [
                    {"kind": "INSERT", "fields": [1, "alice"]},
                    {"kind": "INSERT", "fields": [2, null]}
                ]
            }
        }))
        .unwrap();

        assert_eq!(page.column_names, vec!["id", "name"]);
        assert!(!page.is_end_of_stream);
        assert_eq!(
            page.next_result_uri.as_deref(),
            Some("/v1/sessions/s/operations/o/result/1")
        );
        assert_eq!(
            page.rows,
            vec![
                vec![Value::Int(1), Value::String("alice".to_string())],
                vec![Value::Int(2), Value::Null],
            ]
        );
    }

    #[test]
    fn test_parse_end_of_stream_drops_continuation() {
        let page = parse_result(json!({
            "resultType": "EOS",
            "nextResultUri": "/v1/sessions/s/operations/o/result/2",
            "results": {"columns": [{"name": "c"}], "data": []}
        }))
        .unwrap();

        assert!(page.is_end_of_stream);
        assert_eq!(page.next_result_uri, None);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_parse_not_ready_page() {
        let page = parse_result_str(
            r#"{"resultType":"NOT_READY","nextResultUri":"/next","results":{"columns":[],"data":[]}}"#,
        )
        .unwrap();

        assert!(!page.is_end_of_stream);
        assert_eq!(page.next_result_uri.as_deref(), Some("/next"));
    }

    #[test]
    fn test_parse_invalid_page() {
        let err = parse_result(json!({"results": {}})).unwrap_err();
        assert!(err.to_string().contains("Failed to parse result page"));
    }
}
