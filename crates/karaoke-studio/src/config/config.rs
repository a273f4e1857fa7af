//! Configuration management for karaoke-studio.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, CameraConfig, MAX_COUNTDOWN_FROM, StudioConfig, WaveformConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use karaoke_studio_core::{StudioSettings, waveform::validate_bpm};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tempo and countdown.
    #[serde(default)]
    pub studio: StudioConfig,
    /// Waveform panel.
    #[serde(default)]
    pub waveform: WaveformConfig,
    /// Camera capture.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Audio output.
    #[serde(default)]
    pub audio: AudioConfig,
}

impl Config {
    /// Load configuration from the platform config dir, creating a default
    /// file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate configuration from `path`.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Reject values the studio cannot work with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let fail = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        validate_bpm(self.studio.default_bpm)
            .map_err(|_| fail(format!("default_bpm must be positive, got {}", self.studio.default_bpm)))?;

        if self.studio.countdown_from > MAX_COUNTDOWN_FROM {
            return Err(fail(format!(
                "countdown_from must be at most {}, got {}",
                MAX_COUNTDOWN_FROM, self.studio.countdown_from
            )));
        }

        if self.waveform.bars_per_gridline == 0 {
            return Err(fail("bars_per_gridline must be at least 1".to_string()));
        }

        if !(self.waveform.height.is_finite() && self.waveform.height > 0.0) {
            return Err(fail(format!(
                "waveform height must be positive, got {}",
                self.waveform.height
            )));
        }

        if self.camera.width == 0 || self.camera.height == 0 || self.camera.framerate == 0 {
            return Err(fail(format!(
                "camera dimensions must be non-zero, got {}x{}@{}",
                self.camera.width, self.camera.height, self.camera.framerate
            )));
        }

        if self.camera.source.trim().is_empty() {
            return Err(fail("camera source must not be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to the platform config dir.
    #[track_caller]
    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Studio behaviour derived from this configuration.
    pub fn studio_settings(&self) -> StudioSettings {
        StudioSettings {
            bpm: self.studio.default_bpm,
            bars_per_gridline: self.waveform.bars_per_gridline,
            countdown_enabled: self.studio.countdown_enabled,
            countdown_from: self.studio.countdown_from,
        }
    }

    /// Directory for logs, created on demand.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        let log_dir = Self::project_dirs()?.data_dir().join("logs");

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "karaoke-studio", "Karaoke-Studio").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }
}
