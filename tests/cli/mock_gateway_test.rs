//! End-to-end runs of the binary against the mock gateway.

use super::common::run_flink_sql;
use pretty_assertions::assert_eq;

#[test]
fn test_mock_fetchall_prints_header_and_rows() {
    let (code, stdout, _stderr) = run_flink_sql(&["--mock", "SELECT 1"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "result\nMock result for: SELECT 1\n");
}

#[test]
fn test_mock_fetch_one_with_bindings() {
    let (code, stdout, _stderr) = run_flink_sql(&[
        "--mock",
        "--fetch-one",
        "-b",
        "clicks",
        "-b",
        "5",
        "SELECT * FROM {} LIMIT {}",
    ]);

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "result\nMock result for: SELECT * FROM 'clicks' LIMIT 5\n"
    );
}

#[test]
fn test_missing_statement_fails() {
    let (code, stdout, stderr) = run_flink_sql(&["--mock"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("No statement given"));
}

#[test]
fn test_missing_binding_fails() {
    let (code, _stdout, stderr) = run_flink_sql(&["--mock", "-b", "1", "SELECT {}, {}"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Binding Error"));
}
