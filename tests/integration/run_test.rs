//! End-to-end run tests.
//!
//! Drive `app::run` the way the binary does and check what reaches stdout
//! and stderr.

use db_report::app::{self, RunOutcome};
use db_report::config::ConnectionConfig;
use db_report::db::{self, DatabaseClient, MockDatabaseClient, Row, Value};
use db_report::error::Result;
use db_report::query::Report;
use pretty_assertions::assert_eq;

fn page_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            Row::from_pairs([
                ("page", Value::from(format!("Page_{i}"))),
                ("cnt", Value::Int(1000 - i as i64)),
            ])
        })
        .collect()
}

async fn connect_mock(rows: Vec<Row>) -> Result<Box<dyn DatabaseClient>> {
    Ok(Box::new(MockDatabaseClient::with_rows(rows)))
}

#[tokio::test]
async fn test_n_rows_give_n_lines() {
    for n in [0, 1, 15] {
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());

        let outcome = app::run(connect_mock(page_rows(n)), Report::TopPages, &mut out, &mut err).await;

        assert_eq!(outcome, RunOutcome::Completed { rows: n });
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), n);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("page[Page_{i}] count[{}]", 1000 - i));
        }
        assert!(err.is_empty());
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_refused_connection_prints_single_diagnostic() {
    let config = ConnectionConfig::from_connection_string("mysql://127.0.0.1:1/plyql1").unwrap();
    let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());

    let outcome = app::run(db::connect(&config), Report::TopPages, &mut out, &mut err).await;

    assert_eq!(outcome, RunOutcome::Failed);
    assert!(out.is_empty());

    let err = String::from_utf8(err).unwrap();
    let diagnostics = err
        .lines()
        .filter(|line| !line.starts_with("  caused by:"))
        .count();
    assert_eq!(diagnostics, 1);
    assert!(err.starts_with("Connection error: Cannot connect to 127.0.0.1:1"));
    assert!(!err.contains("Connection Error:"));
    assert!(err.contains("caused by:"));
}
