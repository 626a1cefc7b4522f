//! Configuration management for room-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! default paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CaptureConfig, CoordinatorConfig, EncoderConfig, LoggingConfig, RecorderConfig,
        ServerConfig,
    },
};

use room_recorder_core::PostProcessSettings;

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ingest server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream coordinator configuration.
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    /// Recording storage and post-processing.
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// Encoder used for mp4 conversion.
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Capture program configuration.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `path`, or from the platform config directory
    /// when no path is given. A missing file is created with defaults.
    ///
    /// Note: This does NOT validate the loaded values. Call `validate()`
    /// before wiring the recorder.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config {:?}: {}", config_path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config {:?}: {}", config_path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!(config_path = ?config_path, "No config found, creating default");
            Self::create_default(&config_path)
        }
    }

    /// Check that the values needed to talk to the coordinator and to launch
    /// captures are present.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let missing = [
            ("coordinator.host", self.coordinator.host.trim()),
            ("coordinator.api_key", self.coordinator.api_key.trim()),
            ("capture.program", self.capture.program.trim()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(AppError::ConfigError {
                reason: format!("Missing required settings: {}", missing.join(", ")),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self, config_path: &Path) -> AppResult<()> {
        if let Some(dir) = config_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                debug!(config_dir = ?dir, "Created config directory");
            }
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

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

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Post-processing pipeline settings derived from `[recorder]` and `[encoder]`.
    pub fn post_process_settings(&self) -> PostProcessSettings {
        PostProcessSettings {
            storage_root: self.recorder.storage_root.clone(),
            convert_to_mp4: self.recorder.post_mp4_convert,
            encoder_program: self.encoder.program.clone(),
            pre_input: self.encoder.pre_input.clone(),
            post_input: self.encoder.post_input.clone(),
            hook_scripts: self.recorder.post_processing_scripts.clone(),
        }
    }

    #[track_caller]
    fn default_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "room-recorder", "Room-Recorder").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let config = Config::default();

        config.save(config_path)?;

        warn!(
            config_path = ?config_path,
            "Default config created. Coordinator credentials must be set before starting."
        );

        Ok(config)
    }
}
