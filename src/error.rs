//! Error types for db-report.
//!
//! A single error enum covers every failure of a report run. The variants only
//! differ in how they are labelled in the diagnostic; all of them end the run.

use std::error::Error as StdError;
use std::fmt::Write as _;
use thiserror::Error;

/// Boxed source error attached to a [`ReportError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Main error type for db-report operations.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Connection errors (host unreachable, handshake refused, etc.)
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Query execution errors (rejected SQL, stream failures, etc.)
    #[error("Query error: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Row extraction errors (missing column, incompatible type, etc.)
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration errors (invalid descriptor, unreadable config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure writing report lines to the output stream.
    #[error("Output error: failed to write report output")]
    Output(#[from] std::io::Error),
}

impl ReportError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attaches an underlying cause. Has no effect on `Config` and `Output`.
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        match &mut self {
            Self::Connection { source, .. }
            | Self::Query { source, .. }
            | Self::Decode { source, .. } => *source = Some(cause.into()),
            Self::Config(_) | Self::Output(_) => {}
        }
        self
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "Connection Error",
            Self::Query { .. } => "Query Error",
            Self::Decode { .. } => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Output(_) => "Output Error",
        }
    }
}

/// Renders the full diagnostic for an error: the error itself followed by one
/// `caused by:` line per chained source. The `Display` text already leads with
/// the category.
pub fn render_diagnostic(err: &ReportError) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let _ = write!(out, "\n  caused by: {inner}");
        cause = inner.source();
    }
    out
}

/// Result type alias using ReportError.
pub type Result<T> = std::result::Result<T, ReportError>;
