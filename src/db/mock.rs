//! Mock database client for testing.
//!
//! Serves a fixed list of rows from memory, optionally failing part way
//! through, and records what was asked of it.

use super::{DatabaseClient, Row, RowStream};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A mock database client that returns predefined rows for any query.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    rows: Vec<Row>,
    failure: Option<(usize, String)>,
    queries: Vec<String>,
    pulled: Arc<AtomicUsize>,
}

impl MockDatabaseClient {
    /// Creates a mock client that returns an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock client that returns the given rows in order.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Makes the stream yield a query error instead of the row at `index`.
    pub fn fail_at(mut self, index: usize, message: impl Into<String>) -> Self {
        self.failure = Some((index, message.into()));
        self
    }

    /// SQL texts received so far.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Number of stream items handed out so far, errors included.
    pub fn items_pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    fn query<'a>(&'a mut self, sql: &'a str) -> RowStream<'a> {
        self.queries.push(sql.to_string());

        let mut items: Vec<Result<Row>> = self.rows.iter().cloned().map(Ok).collect();
        if let Some((index, message)) = &self.failure {
            items.truncate(*index);
            items.push(Err(ReportError::query(message.clone())));
        }

        let pulled = Arc::clone(&self.pulled);
        stream::iter(items)
            .inspect(move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
