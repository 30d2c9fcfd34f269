//! Configuration loading tests.

use flink_cursor::config::Config;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[gateway]
host = "sql-gateway"
port = 18083
session_name = "analytics"
request_timeout_secs = 5

[cursor]
fetch_interval_ms = 20
"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.gateway.host, "sql-gateway");
    assert_eq!(config.gateway.port, 18083);
    assert_eq!(config.gateway.session_name, "analytics");
    assert_eq!(config.gateway.request_timeout_secs, 5);
    assert_eq!(
        config.gateway.gateway_url().unwrap(),
        "http://sql-gateway:18083"
    );
    assert_eq!(config.cursor.fetch_interval(), Duration::from_millis(20));
}

#[test]
fn test_load_invalid_config_is_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[gateway]\nport = \"not a number\"").unwrap();

    let err = Config::load_from_file(file.path()).unwrap_err();

    assert_eq!(err.category(), "Configuration Error");
}
