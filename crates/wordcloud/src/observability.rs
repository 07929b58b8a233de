//! Logging and tracing setup.
//!
//! Two sinks are installed:
//! - stderr, human-readable, filtered by `-q`/`-v` (or `RUST_LOG`)
//! - an optional log file, written without blocking, filtered by the
//!   configured `log_level` (or `RUST_LOG`)
//!
//! The log file is enabled by `WORDCLOUD_LOG_PATH` (an explicit file) or by a
//! log directory from `WORDCLOUD_LOG_DIR` or the config's `log_dir`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_PATH_ENV: &str = "WORDCLOUD_LOG_PATH";
const LOG_DIR_ENV: &str = "WORDCLOUD_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "wordcloud.log";

/// Where log output goes, beyond stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file path.
    pub log_path: Option<PathBuf>,
    /// Directory for `wordcloud.log` when no explicit path is set.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, letting `log_dir` (from config) take precedence
    /// over `WORDCLOUD_LOG_DIR`.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        Self {
            log_path: non_empty_env(LOG_PATH_ENV),
            log_dir: log_dir.or_else(|| non_empty_env(LOG_DIR_ENV)),
        }
    }

    /// Directory and file name of the log file, if file logging is on.
    fn log_file(&self) -> Option<(PathBuf, PathBuf)> {
        if let Some(ref path) = self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let name = path.file_name().map(PathBuf::from)?;
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), PathBuf::from(DEFAULT_LOG_FILE)))
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Filter for stderr output.
///
/// `-q` shows errors only; `-v`, `-vv` and `-vvv` raise the level to info,
/// debug and trace. Without either flag `RUST_LOG` applies, then `warn`.
pub fn env_filter(quiet: bool, verbose: u8) -> EnvFilter {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => return EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Filter for the log file: `RUST_LOG` if set, otherwise `level`.
pub fn file_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program.
pub fn init_observability(
    config: &ObservabilityConfig,
    stderr_filter: EnvFilter,
    file_filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match config.log_file() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
