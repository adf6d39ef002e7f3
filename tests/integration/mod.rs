//! Integration tests for db-report.

pub mod connection_test;
pub mod query_test;
pub mod run_test;
