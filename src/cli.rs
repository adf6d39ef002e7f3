//! Command-line argument parsing for db-report.
//!
//! Uses clap to parse CLI arguments and resolves them against the config file.

use crate::config::{Config, ConnectionConfig, DEFAULT_CONNECTION_STRING};
use crate::error::{ReportError, Result};
use crate::query::Report;
use clap::Parser;
use std::path::PathBuf;

/// Runs a fixed aggregation report against a MySQL-protocol endpoint and
/// prints one line per result row.
#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Connection string (e.g., mysql://127.0.0.1:3307/plyql1)
    #[arg(value_name = "CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Report to run
    #[arg(short = 'r', long, value_enum, value_name = "REPORT")]
    pub report: Option<Report>,

    /// Use named connection from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    /// Resolves the connection with precedence:
    /// 1. Connection string argument (highest)
    /// 2. Named connection from config
    /// 3. Default connection from config
    /// 4. The built-in gateway descriptor
    ///
    /// Environment defaults are not applied here.
    pub fn resolve_connection(&self, config: &Config) -> Result<ConnectionConfig> {
        if let Some(conn_str) = &self.connection_string {
            return ConnectionConfig::from_connection_string(conn_str);
        }

        if let Some(name) = self.connection_name() {
            return config.get_connection(Some(name)).cloned().ok_or_else(|| {
                ReportError::config(format!("Connection '{name}' not found in config file"))
            });
        }

        match config.get_connection(None) {
            Some(conn) => Ok(conn.clone()),
            None => ConnectionConfig::from_connection_string(DEFAULT_CONNECTION_STRING),
        }
    }

    /// Resolves which report to run: the flag, then the config file, then the default.
    pub fn resolve_report(&self, config: &Config) -> Report {
        self.report.or(config.report).unwrap_or_default()
    }
}
