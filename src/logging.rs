use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{CurateError, Result};

const LOG_FILE_PREFIX: &str = "mpox-curate.log";

/// Open the daily-rotated log file under `dir`, creating the directory first.
fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir).map_err(|source| CurateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
        .map_err(|e| {
            CurateError::Config(format!(
                "Failed to open log file in '{}': {}",
                dir.display(),
                e
            ))
        })?;

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Initializes the logging system: human-readable events on stderr, plus a
/// daily-rotated JSON file when a log directory is configured.
///
/// Keep the returned guard alive until exit so buffered file logs are flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // Respect RUST_LOG if set; otherwise use the configured level for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mpox_curate={},warn", config.level)));

    // Console events go to stderr
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let (non_blocking_writer, guard) = file_writer(dir)?;
            (
                Some(fmt::layer().json().with_writer(non_blocking_writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_uncreatable_log_dir_is_an_error() {
        // A regular file where a directory component is expected
        let blocker = NamedTempFile::new().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            log_dir: Some(blocker.path().join("logs")),
        };

        match init_logging(&config).unwrap_err() {
            CurateError::Io { path, .. } => assert_eq!(path, blocker.path().join("logs")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_writer_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("a/b/logs");

        let (_writer, _guard) = file_writer(&log_dir).unwrap();
        assert!(log_dir.is_dir());
    }
}
