//! File logging setup.
//!
//! Logs go to `<logs_dir>/opsh.log` so they never interleave with command
//! output on the terminal. The filter comes from `OPSH_LOG`.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "OPSH_LOG";

/// Filter used when `OPSH_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "opsh=info,opsh_core=info,opsh_interaction=info,opsh_execution=info,opsh_application=info";

pub const LOG_FILE_NAME: &str = "opsh.log";

/// Builds the filter from `directive`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber writing to `logs_dir`.
///
/// Returns `None` when the log file cannot be opened; the shell keeps working
/// without logs. Keep the guard alive until exit so buffered lines flush.
pub fn init_logging(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!("Warning: Could not create log directory {logs_dir:?}: {e}");
        return None;
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let log_path = logs_dir.join(LOG_FILE_NAME);
    let log_file = match options.open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {log_path:?}: {e}");
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let directive = std::env::var(LOG_FILTER_ENV).ok();
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(build_filter(directive.as_deref()))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }

    Some(guard)
}
