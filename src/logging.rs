//! Logging setup: one fmt layer writing to stdout and a daily rotated file in the log directory.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Log files are named `kittybot.<date>.log`
pub const LOG_FILE_PREFIX: &str = "kittybot";
pub const LOG_FILE_SUFFIX: &str = "log";

/// Rotated files kept on disk, the current one included
pub const MAX_LOG_FILES: usize = 7;

/// Filter used when `RUST_LOG` is unset. HTTP and Telegram internals stay at warn.
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn,teloxide=warn";

/// File writer rolling over at midnight and pruning files past [`MAX_LOG_FILES`]
pub fn file_appender(log_dir: impl AsRef<Path>) -> Result<RollingFileAppender> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))
}

/// Install the global tracing subscriber.
///
/// Creates `log_dir` if needed. Reads the level from `RUST_LOG`, so load `.env`
/// before calling this.
pub fn init_logging(log_dir: impl AsRef<Path>) -> Result<()> {
    let log_dir = log_dir.as_ref();
    let writer = io::stdout.and(file_appender(log_dir)?);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    tracing::info!(log_dir = %log_dir.display(), max_files = MAX_LOG_FILES, "Logging configured");
    Ok(())
}
