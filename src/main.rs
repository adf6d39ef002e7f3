//! db-report - a one-shot reporting client for MySQL-protocol endpoints.

use std::io;

use db_report::app::{self, RunOutcome};
use db_report::cli::Cli;
use db_report::config::{Config, ConnectionConfig};
use db_report::db;
use db_report::error::Result;
use db_report::logging;
use db_report::query::Report;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();

    match cli.log_file.as_deref() {
        Some(path) => logging::init_file_logging(path),
        None => logging::init_stderr_logging(),
    }

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();

    let outcome = match resolve(&cli) {
        Ok((connection, report)) => {
            info!("Running {} against {}", report, connection.display_string());
            app::run(db::connect(&connection), report, &mut stdout, &mut stderr).await
        }
        Err(e) => {
            app::report_failure(&e, &mut stderr);
            RunOutcome::Failed
        }
    };

    std::process::exit(outcome.exit_code());
}

/// Loads the config file and resolves the connection and report to use.
fn resolve(cli: &Cli) -> Result<(ConnectionConfig, Report)> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut connection = cli.resolve_connection(&config)?;
    connection.apply_env_defaults();

    Ok((connection, cli.resolve_report(&config)))
}
