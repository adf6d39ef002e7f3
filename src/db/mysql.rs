//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient` trait
//! over a single sqlx `MySqlConnection`. Statements go out over the plain text
//! protocol so that gateways without prepared-statement support can serve them.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, DatabaseClient, Row, RowStream, Timestamp, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use futures::StreamExt;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column as SqlxColumn, ConnectOptions, Connection, Row as SqlxRow, TypeInfo, ValueRef};
use tracing::debug;

/// MySQL database client holding one open session.
#[derive(Debug)]
pub struct MySqlClient {
    conn: MySqlConnection,
}

impl MySqlClient {
    /// Opens a session to the configured endpoint. A single attempt is made.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = connect_options(config)?;

        debug!("Connecting to {}", config.display_string());
        let conn = options
            .connect()
            .await
            .map_err(|e| map_connection_error(e, config))?;
        debug!("Successfully connected to database");

        Ok(Self { conn })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    fn query<'a>(&'a mut self, sql: &'a str) -> RowStream<'a> {
        debug!("Executing query: {}", sql);
        sqlx::raw_sql(sql)
            .fetch(&mut self.conn)
            .map(|row| match row {
                Ok(row) => convert_row(&row),
                Err(e) => Err(ReportError::query(format_query_error(&e)).with_source(e)),
            })
            .boxed()
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| ReportError::connection("Failed to close connection").with_source(e))
    }
}

/// Builds connect options from the config.
///
/// Session setup is kept to the bare handshake: no `SET sql_mode` or
/// `SET time_zone` statements are sent after connecting.
fn connect_options(config: &ConnectionConfig) -> Result<MySqlConnectOptions> {
    let host = config.host.as_deref().unwrap_or("localhost");
    let database = config
        .database
        .as_deref()
        .ok_or_else(|| ReportError::config("Database name is required"))?;

    let mut options = MySqlConnectOptions::new()
        .host(host)
        .port(config.port())
        .database(database)
        .pipes_as_concat(false)
        .no_engine_substitution(false)
        .timezone(None::<String>);

    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    Ok(options)
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Result<Row> {
    let columns: Vec<ColumnInfo> = row
        .columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect();

    let values = columns
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col))
        .collect::<Result<Vec<_>>>()?;

    Ok(Row::new(columns, values))
}

/// Converts a single column value from a MySqlRow to our Value type.
///
/// Unlike a lossy viewer, a value that fails to decode fails the row.
fn convert_value(row: &MySqlRow, index: usize, col: &ColumnInfo) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(|e| decode_error(col, e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match col.data_type.as_str() {
        "NULL" => Value::Null,

        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index).map_err(|e| decode_error(col, e))?),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::Int(row.try_get::<i64, _>(index).map_err(|e| decode_error(col, e))?)
        }

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            Value::UInt(row.try_get::<u64, _>(index).map_err(|e| decode_error(col, e))?)
        }

        "FLOAT" => Value::Float(f64::from(
            row.try_get::<f32, _>(index).map_err(|e| decode_error(col, e))?,
        )),

        "DOUBLE" => Value::Float(row.try_get::<f64, _>(index).map_err(|e| decode_error(col, e))?),

        "DECIMAL" => {
            Value::Decimal(row.try_get::<Decimal, _>(index).map_err(|e| decode_error(col, e))?)
        }

        "DATETIME" | "TIMESTAMP" => Value::Timestamp(Timestamp(
            row.try_get::<NaiveDateTime, _>(index)
                .map_err(|e| decode_error(col, e))?,
        )),

        "DATE" => Value::Date(row.try_get::<NaiveDate, _>(index).map_err(|e| decode_error(col, e))?),

        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            Value::Bytes(row.try_get::<Vec<u8>, _>(index).map_err(|e| decode_error(col, e))?)
        }

        // CHAR, VARCHAR, TEXT variants and anything else the server can send as text
        _ => Value::String(row.try_get::<String, _>(index).map_err(|e| decode_error(col, e))?),
    };

    Ok(value)
}

fn decode_error(col: &ColumnInfo, error: sqlx::Error) -> ReportError {
    ReportError::decode(format!(
        "cannot decode column '{}' of type {}",
        col.name, col.data_type
    ))
    .with_source(error)
}

/// Maps sqlx connection errors to user-friendly messages, keeping the original
/// error as the cause.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ReportError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port();
    let user = config.user.as_deref().unwrap_or("root");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    let message = if error_str.contains("connection refused")
        || error_str.contains("could not connect")
    {
        format!("Cannot connect to {host}:{port}. Check that the server is running.")
    } else if error_str.contains("access denied") {
        format!("Authentication failed for user '{user}'. Check your credentials.")
    } else if error_str.contains("unknown database") {
        format!("Database '{database}' does not exist.")
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        )
    } else {
        format!("Cannot connect to {host}:{port}")
    };

    ReportError::connection(message).with_source(error)
}

/// Formats a query error, using the server's error code when there is one.
fn format_query_error(error: &sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("ERROR {}: {}", code, db_error.message()),
            None => db_error.message().to_string(),
        },
        None => error.to_string(),
    }
}
