//! Flink cursor - a pull-based SQL cursor over the Flink SQL Gateway.
//!
//! This library exposes the core modules for use by the `flink-sql` binary
//! and integration tests.

pub mod config;
pub mod cursor;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod logging;

pub use cursor::Cursor;
pub use error::{Result, SqlGatewayError};
pub use handler::FlinkHandler;
