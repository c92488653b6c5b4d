//! Tracing subscriber installation.

use crate::config::LoggingConfig;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

/// File name prefix for daily log files; a `.YYYY-MM-DD` UTC date is appended.
pub const LOG_FILE_PREFIX: &str = "app.log";

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. When a log
/// directory is configured, output goes to a daily-rolling file and the
/// returned guard must be held until exit so buffered lines are flushed.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
#[must_use]
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (writer, guard) = config.directory.as_deref().map_or_else(
        || (BoxMakeWriter::new(std::io::stdout), None),
        |directory| {
            let (file_writer, file_guard) =
                tracing_appender::non_blocking(rolling::daily(directory, LOG_FILE_PREFIX));
            (BoxMakeWriter::new(file_writer), Some(file_guard))
        },
    );
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = installed {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
    guard
}

