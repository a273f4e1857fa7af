//! Structured logging for karaoke-studio.
//!
//! Writes to stderr and to a daily-rotated file in the project data dir.
//! Old log files are pruned at startup, keeping the 7 most recent.

use crate::{AppError, AppResult, config::Config};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use error_location::ErrorLocation;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, prelude::*};

const LOG_FILE_PREFIX: &str = "karaoke-studio.log";
const MAX_LOG_FILES: usize = 7;
const DEFAULT_FILTER: &str = "karaoke_studio=debug,karaoke_studio_core=debug";

/// Keeps the non-blocking writer alive for the program lifetime.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
#[track_caller]
pub fn init_logging() -> AppResult<PathBuf> {
    let log_dir = Config::log_dir()?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to cleanup old logs: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD.set(guard).map_err(|_| AppError::UiError {
        reason: "Logging already initialized".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| AppError::UiError {
            reason: format!("Failed to install subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    tracing::debug!(log_dir = %log_dir.display(), "Logging initialized");

    Ok(log_dir)
}

/// Whether `file_name` is a rotated log (`karaoke-studio.log.YYYY-MM-DD`).
pub(crate) fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.len() == 10 && date.matches('-').count() == 2)
}

/// Remove rotated logs beyond the newest [`MAX_LOG_FILES`].
pub(crate) fn cleanup_old_logs(log_dir: &Path) -> AppResult<usize> {
    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_rotated_log(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to delete old log file {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}
