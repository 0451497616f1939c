//! TOML Configuration File Support
//!
//! Optional configuration at `~/.config/breathe/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [audio]
//! enabled = true
//! volume = 0.15
//!
//! [timing]
//! target_fps = 60
//! max_frame_delta_ms = 50
//!
//! [session]
//! min_cycles = 1
//! max_cycles = 99
//!
//! [animation]
//! easing = "smooth_step"
//! particles = 24
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{EasingFunction, MAX_PARTICLES};
use crate::machine::CycleLimits;

/// Lowest accepted frame rate
pub const MIN_FPS: u32 = 10;
/// Highest accepted frame rate
pub const MAX_FPS: u32 = 240;
/// Largest accepted frame delta clamp, in milliseconds
pub const MAX_FRAME_DELTA_CEILING_MS: u64 = 1000;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Cycle count outside the configured limits
    #[error("Invalid cycle count {value}: must be between {min} and {max}")]
    InvalidCycles {
        /// Requested count
        value: i64,
        min: u32,
        max: u32,
    },
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Audio section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Whether cues are played at all
    pub enabled: Option<bool>,

    /// Output volume, 0.0 to 1.0
    pub volume: Option<f32>,
}

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Frames per second the scheduler aims for
    pub target_fps: Option<u32>,

    /// Ceiling on the per-tick time delta in milliseconds
    pub max_frame_delta_ms: Option<u64>,
}

/// Session section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionToml {
    pub min_cycles: Option<u32>,
    pub max_cycles: Option<u32>,
}

/// Animation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    pub easing: Option<EasingFunction>,

    /// Number of particles around the breathing circle
    pub particles: Option<usize>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BreatheToml {
    pub audio: AudioToml,
    pub timing: TimingToml,
    pub session: SessionToml,
    pub animation: AnimationToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective configuration after merging every source
#[derive(Clone, Debug, PartialEq)]
pub struct BreatheConfig {
    pub audio_enabled: bool,
    pub volume: f32,
    pub target_fps: u32,
    /// Ceiling on `dt` so a stall never turns into a visible jump
    pub max_frame_delta: Duration,
    pub cycle_limits: CycleLimits,
    pub easing: EasingFunction,
    pub particle_count: usize,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for BreatheConfig {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            volume: 0.15,
            target_fps: 60,
            max_frame_delta: Duration::from_millis(50),
            cycle_limits: CycleLimits::default(),
            easing: EasingFunction::default(),
            particle_count: 24,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl BreatheConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Tick budget derived from the target frame rate
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Check every value is within range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.target_fps) {
            return Err(ConfigError::ValidationError(format!(
                "target_fps must be between {MIN_FPS} and {MAX_FPS}, got {}",
                self.target_fps
            )));
        }
        let delta_ms = self.max_frame_delta.as_millis();
        if delta_ms == 0 || delta_ms > u128::from(MAX_FRAME_DELTA_CEILING_MS) {
            return Err(ConfigError::ValidationError(format!(
                "max_frame_delta_ms must be between 1 and {MAX_FRAME_DELTA_CEILING_MS}, got {delta_ms}"
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::ValidationError(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }
        let limits = self.cycle_limits;
        if limits.min == 0 || limits.min > limits.max {
            return Err(ConfigError::ValidationError(format!(
                "cycle limits must satisfy 1 <= min_cycles <= max_cycles, got {}..={}",
                limits.min, limits.max
            )));
        }
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::ValidationError(format!(
                "particles must be at most {MAX_PARTICLES}, got {}",
                self.particle_count
            )));
        }
        Ok(())
    }

    /// Check a requested cycle count against the limits
    pub fn validate_cycles(&self, value: i64) -> Result<u32, ConfigError> {
        let CycleLimits { min, max } = self.cycle_limits;
        if value < i64::from(min) || value > i64::from(max) {
            return Err(ConfigError::InvalidCycles { value, min, max });
        }
        u32::try_from(value).map_err(|_| ConfigError::InvalidCycles { value, min, max })
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/breathe/config.toml` or
/// `~/.config/breathe/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("breathe").join("config.toml"))
}

/// Load configuration from the default path and the process environment
///
/// A missing file is not an error.
pub fn load_config() -> Result<BreatheConfig, ConfigError> {
    load_config_from_path(default_config_path().as_deref(), false, |key| std::env::var(key).ok())
}

/// Load configuration from `path` plus environment values from `env`
///
/// With `required` set, a missing file is a read error instead of falling
/// back to defaults (used for an explicit `--config`).
pub fn load_config_from_path<E>(
    path: Option<&Path>,
    required: bool,
    env: E,
) -> Result<BreatheConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut config = BreatheConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() || required {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: BreatheToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut BreatheConfig, toml: &BreatheToml) {
    if let Some(enabled) = toml.audio.enabled {
        config.audio_enabled = enabled;
    }
    if let Some(volume) = toml.audio.volume {
        config.volume = volume;
    }

    if let Some(fps) = toml.timing.target_fps {
        config.target_fps = fps;
    }
    if let Some(ms) = toml.timing.max_frame_delta_ms {
        config.max_frame_delta = Duration::from_millis(ms);
    }

    if let Some(min) = toml.session.min_cycles {
        config.cycle_limits.min = min;
    }
    if let Some(max) = toml.session.max_cycles {
        config.cycle_limits.max = max;
    }

    if let Some(easing) = toml.animation.easing {
        config.easing = easing;
    }
    if let Some(count) = toml.animation.particles {
        config.particle_count = count;
    }
}

fn apply_env_config<E>(config: &mut BreatheConfig, env: E)
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(audio) = env("BREATHE_AUDIO") {
        config.audio_enabled = audio != "0" && !audio.eq_ignore_ascii_case("false");
        config.source = ConfigSource::Env;
    }
    if let Some(fps) = env("BREATHE_FPS") {
        if let Ok(fps) = fps.parse::<u32>() {
            config.target_fps = fps;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(ms) = env("BREATHE_MAX_DT_MS") {
        if let Ok(ms) = ms.parse::<u64>() {
            config.max_frame_delta = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub audio_enabled: Option<bool>,
    pub target_fps: Option<u32>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
        self.audio_enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut BreatheConfig) -> Result<(), ConfigError> {
        if self.audio_enabled.is_some() || self.target_fps.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(enabled) = self.audio_enabled {
            config.audio_enabled = enabled;
        }
        if let Some(fps) = self.target_fps {
            config.target_fps = fps;
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
