//! Database abstraction layer for db-report.
//!
//! Provides a trait-based interface over a single database session that hands
//! out forward-only row streams, so reports can be run against MySQL or an
//! in-memory mock interchangeably.

mod mock;
mod mysql;
mod types;

pub use mock::MockDatabaseClient;
pub use mysql::MySqlClient;
pub use types::{ColumnInfo, Row, Timestamp, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A single-pass stream of decoded rows. Once consumed it cannot be restarted.
///
/// The first item surfaces any error from executing the statement; later items
/// surface fetch and decode errors for individual rows.
pub type RowStream<'a> = BoxStream<'a, Result<Row>>;

/// Opens a session to the endpoint described by `config`.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = MySqlClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
#[async_trait]
pub trait DatabaseClient: Send {
    /// Executes `sql` and returns a cursor over its rows.
    ///
    /// Rows are fetched lazily as the stream is polled.
    fn query<'a>(&'a mut self, sql: &'a str) -> RowStream<'a>;

    /// Closes the session.
    async fn close(self: Box<Self>) -> Result<()>;
}
