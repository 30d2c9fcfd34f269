//! Tests for the `flink-sql` binary.

pub mod common;
pub mod mock_gateway_test;
