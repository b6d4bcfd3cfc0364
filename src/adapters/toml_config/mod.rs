// TOML config adapter - Tool configuration loaded from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::CodecSettings;
use crate::domain::rules::is_valid_bitrate;
use crate::engine::EngineConfig;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "joinx.toml";

/// Locations of the external tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutablePaths {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ExecutablePaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// Subprocess limits and scratch space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Limit for one ffmpeg run
    pub timeout_seconds: u64,
    /// Limit for one ffprobe run
    pub probe_timeout_seconds: u64,
    /// Where concat lists are written; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    /// ffmpeg `-loglevel`
    pub ffmpeg_log_level: String,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 3600,
            probe_timeout_seconds: 60,
            temp_dir: None,
            ffmpeg_log_level: "error".to_string(),
        }
    }
}

/// Complete tool configuration
///
/// ```toml
/// [tools]
/// ffmpeg = "/usr/local/bin/ffmpeg"
///
/// [codecs]
/// video_bitrate = "8000k"
///
/// [execution]
/// timeout_seconds = 600
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    #[serde(rename = "tools")]
    pub executables: ExecutablePaths,
    #[serde(rename = "codecs")]
    pub codec_defaults: CodecSettings,
    pub execution: ExecutionSettings,
}

impl ToolConfig {
    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        toml::from_str(content).map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment
    pub fn apply_environment(&mut self) -> Result<(), DomainError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let mut set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("Environment override: {} = {}", key, value);
                *target = value;
                applied += 1;
            }
        };

        set(&mut self.executables.ffmpeg, "FFMPEG_PATH");
        set(&mut self.executables.ffprobe, "FFPROBE_PATH");
        set(&mut self.codec_defaults.video_codec, "JOINX_VIDEO_CODEC");
        set(&mut self.codec_defaults.audio_codec, "JOINX_AUDIO_CODEC");
        set(&mut self.codec_defaults.video_bitrate, "JOINX_VIDEO_BITRATE");
        set(&mut self.codec_defaults.audio_bitrate, "JOINX_AUDIO_BITRATE");

        if let Some(dir) = lookup("FFMPEG_TEMP_DIR").filter(|v| !v.is_empty()) {
            self.execution.temp_dir = Some(PathBuf::from(dir));
            applied += 1;
        }
        if let Some(raw) = lookup("JOINX_TIMEOUT_SECONDS") {
            self.execution.timeout_seconds = raw
                .trim()
                .parse()
                .map_err(|_| DomainError::Config(format!("Invalid JOINX_TIMEOUT_SECONDS: {}", raw)))?;
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(())
    }

    /// Reject values the adapters cannot work with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.execution.timeout_seconds == 0 {
            return Err(DomainError::Config("timeout_seconds must be greater than 0".to_string()));
        }
        if self.execution.probe_timeout_seconds == 0 {
            return Err(DomainError::Config("probe_timeout_seconds must be greater than 0".to_string()));
        }
        if self.executables.ffmpeg.trim().is_empty() || self.executables.ffprobe.trim().is_empty() {
            return Err(DomainError::Config("executable paths cannot be empty".to_string()));
        }
        if self.codec_defaults.video_codec.trim().is_empty() || self.codec_defaults.audio_codec.trim().is_empty() {
            return Err(DomainError::Config("codec names cannot be empty".to_string()));
        }
        for (name, value) in [
            ("video_bitrate", &self.codec_defaults.video_bitrate),
            ("audio_bitrate", &self.codec_defaults.audio_bitrate),
        ] {
            if !is_valid_bitrate(value) {
                return Err(DomainError::Config(format!(
                    "Invalid {}: '{}' (expected digits with optional k/M suffix)",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.execution.timeout_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.execution.probe_timeout_seconds)
    }

    /// Configured temp dir, or the system one
    pub fn temp_dir(&self) -> PathBuf {
        self.execution.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Settings handed to the command builders
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            log_level: self.execution.ffmpeg_log_level.clone(),
            codecs: self.codec_defaults.clone(),
        }
    }
}
