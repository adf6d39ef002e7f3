//! Top-level report run for db-report.
//!
//! Connects, runs one report, closes the session, and funnels every failure
//! into a single diagnostic on the error stream.

use std::future::Future;
use std::io::Write;

use tracing::{debug, info};

use crate::db::DatabaseClient;
use crate::error::{render_diagnostic, ReportError, Result};
use crate::query::{QueryRunner, Report};

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The result set was exhausted; `rows` lines were printed.
    Completed { rows: usize },
    /// An error ended the run after its diagnostic was written.
    Failed,
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed { .. } => 0,
            Self::Failed => 1,
        }
    }
}

/// Runs `report` over the session produced by `connect`, writing report lines
/// to `out` and, on failure, one diagnostic to `err`.
pub async fn run<F, W, E>(connect: F, report: Report, out: &mut W, err: &mut E) -> RunOutcome
where
    F: Future<Output = Result<Box<dyn DatabaseClient>>>,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    match execute(connect, report, out).await {
        Ok(rows) => {
            info!(rows, "Report completed");
            RunOutcome::Completed { rows }
        }
        Err(error) => {
            report_failure(&error, err);
            RunOutcome::Failed
        }
    }
}

async fn execute<F, W>(connect: F, report: Report, out: &mut W) -> Result<usize>
where
    F: Future<Output = Result<Box<dyn DatabaseClient>>>,
    W: Write + ?Sized,
{
    let mut client = connect.await?;
    let rows = QueryRunner::new(report).run(&mut *client, out).await?;
    client.close().await?;
    Ok(rows)
}

/// Writes the diagnostic for `error` to `err`.
pub fn report_failure<E>(error: &ReportError, err: &mut E)
where
    E: Write + ?Sized,
{
    debug!(category = error.category(), "Report run failed");
    // Nothing left to report to if the error stream itself is gone.
    let _ = writeln!(err, "{}", render_diagnostic(error));
    let _ = err.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockDatabaseClient, Row, Value};
    use pretty_assertions::assert_eq;

    fn mock(rows: Vec<Row>) -> impl Future<Output = Result<Box<dyn DatabaseClient>>> {
        async move { Ok(Box::new(MockDatabaseClient::with_rows(rows)) as Box<dyn DatabaseClient>) }
    }

    #[tokio::test]
    async fn test_completed_run() {
        let rows = vec![Row::from_pairs([
            ("page", Value::from("Barack_Obama")),
            ("cnt", Value::Int(20000)),
        ])];
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());

        let outcome = run(mock(rows), Report::TopPages, &mut out, &mut err).await;

        assert_eq!(outcome, RunOutcome::Completed { rows: 1 });
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "page[Barack_Obama] count[20000]\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_connect_failure_prints_one_diagnostic() {
        let connect = async {
            Err::<Box<dyn DatabaseClient>, _>(ReportError::connection(
                "Cannot connect to 127.0.0.1:3307",
            ))
        };
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());

        let outcome = run(connect, Report::TopPages, &mut out, &mut err).await;

        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(outcome.exit_code(), 1);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Connection error: Cannot connect to 127.0.0.1:3307\n"
        );
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_earlier_lines_out_of_stderr() {
        let rows = vec![
            Row::from_pairs([("page", Value::from("Main_Page")), ("cnt", Value::Int(1))]),
            Row::from_pairs([("page", Value::from("Main_Page"))]),
        ];
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());

        let outcome = run(mock(rows), Report::TopPages, &mut out, &mut err).await;

        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(String::from_utf8(out).unwrap(), "page[Main_Page] count[1]\n");
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Decode Error:"));
        assert!(!err.contains("page["));
    }
}
