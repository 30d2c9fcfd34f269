//! Library-level integration tests.

pub mod config_test;
pub mod cursor_test;
pub mod live_gateway_test;
