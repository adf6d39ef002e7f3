//! Report definitions and execution for db-report.
//!
//! This module isolates the fixed report queries, their row decoding and
//! line formatting, and the loop that streams rows to the output.

pub mod report;
pub mod runner;

pub use report::{ChannelActivity, PageCount, Report, ReportRow};
pub use runner::QueryRunner;
