//! Common test utilities for binary tests.

use std::process::Command;

/// Run flink-sql with the given arguments.
///
/// The config path is pinned to a missing file so a user config on the test
/// machine cannot leak into the run.
pub fn run_flink_sql(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_flink-sql"))
        .args(["--config", "/nonexistent/flink-cursor/config.toml"])
        .args(args)
        .env_remove("FLINK_GATEWAY_HOST")
        .env_remove("FLINK_GATEWAY_PORT")
        .env_remove("FLINK_GATEWAY_SESSION")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
