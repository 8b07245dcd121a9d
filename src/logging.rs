//! Logging initialization for candidash.
//!
//! TUI mode: logs to `<data_dir>/candidash.log` so they never touch the
//! terminal the dashboard is drawing on.
//! CLI mode: logs to stderr.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in TUI mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging based on mode and configuration.
///
/// `RUST_LOG` wins over everything; `--debug` wins over the configured
/// level. Returns a `LoggingHandle` that must be kept alive for the
/// duration of the program.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let log_level = if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(log_level));

    if is_tui_mode && config.logging.to_file {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)?;

        let log_file_path = config.log_path();
        let log_filename = log_file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "candidash.log".to_string());

        let file_appender = tracing_appender::rolling::never(&data_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        // CLI mode or TUI with file logging disabled: log to stderr
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.data_dir = Some(temp_dir.path().to_string_lossy().to_string());
        config
    }

    #[test]
    fn test_log_path_lives_in_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let log_path = config.log_path();
        assert!(log_path.starts_with(temp_dir.path()));
        assert!(log_path.to_string_lossy().ends_with("candidash.log"));
    }

    #[test]
    fn test_cli_mode_no_log_file() {
        // We can't call init_logging twice (global subscriber), so check
        // the condition that selects the stderr branch.
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let is_tui_mode = false;
        assert!(!is_tui_mode || !config.logging.to_file);
    }

    #[test]
    fn test_tui_mode_with_file_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.logging.to_file = false;

        let is_tui_mode = true;
        assert!(!(is_tui_mode && config.logging.to_file));
    }
}
