// Logging setup.
// Routes tracing output to a daily log file, leaving the terminal to the previewer.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, WidgetError};

pub const LOG_ENV: &str = "WINGTABLE_LOG";
const DEFAULT_FILTER: &str = "wingtable=info";

/// Install the global subscriber. Keep the guard alive until exit so buffered lines flush.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "wingtable.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| WidgetError::Other(format!("logging already set up: {}", e)))?;

    Ok(guard)
}
