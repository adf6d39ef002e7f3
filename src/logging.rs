//! Logging configuration for db-report.
//!
//! Report lines own stdout and the failure diagnostic owns stderr, so tracing
//! output is either kept quiet on stderr or redirected to a log file.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when logging to stderr.
const STDERR_DEFAULT_FILTER: &str = "warn";

/// Default filter when logging to a file.
const FILE_DEFAULT_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initializes logging to stderr, warnings and above unless `RUST_LOG` says otherwise.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_DEFAULT_FILTER))
        .with_writer(io::stderr)
        .init();
}

/// Initializes logging to the file at `path`.
///
/// The file is truncated on each run. If it cannot be created, a warning is
/// printed and logging falls back to stderr.
pub fn init_file_logging(path: &Path) {
    let log_file = match open_log_file(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {}: {e}", path.display());
            init_stderr_logging();
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_DEFAULT_FILTER))
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .init();
}

/// Creates (or truncates) the log file, creating parent directories as needed.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}
