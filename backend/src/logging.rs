//! Tracing subscriber setup shared by the binaries.
//!
//! Events always go to stdout as JSON. When a log directory is configured,
//! `combined.log` receives the same stream and `error.log` only `ERROR`
//! events; both files are opened in append mode.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::settings::LoggingSettings;

/// File receiving every event.
pub const COMBINED_LOG: &str = "combined.log";
/// File receiving `ERROR` events only.
pub const ERROR_LOG: &str = "error.log";

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A log file could not be created or opened.
    #[error("failed to open log file {path}: {source}")]
    File {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] TryInitError),
}

/// Append handles for the two log files under `dir`.
#[derive(Debug)]
pub struct LogFiles {
    /// `combined.log`.
    pub combined: File,
    /// `error.log`.
    pub errors: File,
}

fn open_append(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::File {
            path: path.display().to_string(),
            source,
        })
}

/// Create `dir` if needed and open both log files for appending.
///
/// # Errors
///
/// Returns [`LoggingError::File`] when the directory or a file cannot be
/// created.
pub fn open_log_files(dir: &Path) -> Result<LogFiles, LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::File {
        path: dir.display().to_string(),
        source,
    })?;
    Ok(LogFiles {
        combined: open_append(&dir.join(COMBINED_LOG))?,
        errors: open_append(&dir.join(ERROR_LOG))?,
    })
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level.
///
/// # Errors
///
/// Returns [`LoggingError`] when a log file cannot be opened or a subscriber
/// is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let level = settings.level();
    let console = fmt::layer().json().with_filter(filter(level));
    let files = settings.dir().map(open_log_files).transpose()?;
    let (combined, errors) = match files {
        Some(LogFiles { combined, errors }) => (
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(combined)
                    .with_filter(filter(level)),
            ),
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(errors.with_max_level(Level::ERROR))
                    .with_filter(filter(level)),
            ),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(combined)
        .with(errors)
        .try_init()?;
    Ok(())
}
