//! Console + daily-rotating file logging.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::load_config::LoggingConfig;

/// Install the global subscriber: `RUST_LOG` filter (default `info`), human
/// readable console output and a plain-text file rotated at midnight.
///
/// Returns `None` when a global subscriber is already installed (tests, or a
/// second `run` in the same process). The returned guard flushes the file
/// writer on drop and must be kept alive for the lifetime of the program.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("Failed to create log directory {:?}", config.directory))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_prefix.clone())
        .max_log_files(config.max_files.unwrap_or(30).max(1))
        .build(&config.directory)
        .context("Failed to create rolling log file")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init();

    match installed {
        Ok(()) => {
            tracing::info!(
                directory = %config.directory.display(),
                prefix = %config.file_prefix,
                "Logging initialised"
            );
            Ok(Some(guard))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not install global subscriber");
            Ok(None)
        }
    }
}

/// Console-only subscriber for the few events emitted before the config,
/// and with it the log directory, is known.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
}
