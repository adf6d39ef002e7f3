//! Streams a report's result set to an output, one line per row.

use std::io::Write;

use futures::StreamExt;
use tracing::{debug, info};

use crate::db::DatabaseClient;
use crate::error::Result;
use crate::query::Report;

/// Runs one report against an open session.
#[derive(Debug, Clone, Copy)]
pub struct QueryRunner {
    report: Report,
}

impl QueryRunner {
    /// Creates a runner for the given report.
    pub fn new(report: Report) -> Self {
        Self { report }
    }

    /// Executes the report query and writes each row's line to `out` in the
    /// order the rows arrive. Returns the number of lines written.
    ///
    /// The first failing row ends the run; lines already written stay written
    /// and no later row is pulled from the stream.
    pub async fn run<W>(&self, client: &mut dyn DatabaseClient, out: &mut W) -> Result<usize>
    where
        W: Write + ?Sized,
    {
        info!(report = self.report.name(), "Executing report query");

        let mut rows = client.query(self.report.sql());
        let mut written = 0;

        while let Some(row) = rows.next().await {
            let line = self.report.render(&row?)?;
            writeln!(out, "{line}")?;
            written += 1;
        }
        out.flush()?;

        debug!("Result set exhausted after {} rows", written);
        Ok(written)
    }
}
