//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "staff-attendance.log";

/// Build the env filter: `RUST_LOG` wins, else the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// Logs go to stderr, and also to a daily rolling file when a directory is
/// configured. Keep the returned guard alive so buffered file output gets
/// flushed on exit.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let registry = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer());

    if config.directory.trim().is_empty() {
        registry.init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry.with(fmt::layer().with_writer(writer).with_ansi(false)).init();
    Some(guard)
}
