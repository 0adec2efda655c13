//! Logging and tracing initialization.
//!
//! The subscriber is scoped: [`init_logging`] installs it as the default for
//! the calling thread and hands back a [`LoggingGuard`]. Dropping the guard at
//! shutdown uninstalls it. The binary drives everything on a current-thread
//! runtime, so every stage logs through this one subscriber.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;
use crate::error::{SplitcatError, SplitcatResult};

/// Keeps the run's subscriber installed until dropped.
#[must_use = "logging is uninstalled as soon as the guard is dropped"]
pub struct LoggingGuard {
    _default: tracing::subscriber::DefaultGuard,
}

impl std::fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingGuard").finish_non_exhaustive()
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init_logging(config: &LoggingConfig) -> SplitcatResult<LoggingGuard> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| SplitcatError::io_at("open log file", path, e))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let guard = if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(config.file.is_none())
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    };

    Ok(LoggingGuard { _default: guard })
}
