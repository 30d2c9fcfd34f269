//! Logging configuration.
//!
//! The binary writes logs to stderr so stdout only carries result rows.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging to stderr with an explicit verbosity.
///
/// `verbose` raises this crate's level to `debug`.
pub fn init_stderr_logging_with(verbose: bool) {
    if !verbose {
        init_stderr_logging();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info,flink_cursor=debug"))
        .with_writer(std::io::stderr)
        .init();
}
