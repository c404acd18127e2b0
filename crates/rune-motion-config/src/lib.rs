//! Rune Motion configuration system
//!
//! This crate provides centralized configuration for the motion engine,
//! loading defaults from `motion.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "motion.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`MotionConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the motion engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MotionConfig {
    /// Spring integrator defaults
    pub spring: SpringConfig,
    /// Tween defaults
    pub tween: TweenConfig,
    /// Variant propagation settings
    pub propagation: PropagationConfig,
    /// Frame clock settings
    pub clock: ClockConfig,
}

/// Built-in spring parameters, used for any field a spring spec leaves unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Pull toward the target per frame (0.0 to 1.0)
    pub stiffness: f64,
    /// Velocity loss per frame (0.0 to 1.0)
    pub damping: f64,
    /// Distance and per-frame step below which a field settles
    pub precision: f64,
}

/// Built-in tween parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    /// Tween duration in milliseconds
    pub duration_ms: f64,
    /// Easing curve applied when a tween spec names none
    pub easing: EasingName,
}

/// Named easing curves accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingName {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Variant propagation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Number of structural levels below the root that are searched for markers.
    ///
    /// Two levels matches the historical behavior of the engine.
    pub depth: usize,
}

/// Frame clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Frames per second used by simulated clocks
    pub frame_rate: u32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 0.15,
            damping: 0.8,
            precision: 0.01,
        }
    }
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            duration_ms: 400.0,
            easing: EasingName::Linear,
        }
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self { depth: 2 }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { frame_rate: 60 }
    }
}

impl MotionConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the motion.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default location (motion.toml in the current directory)
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Some(v) = env_parse::<f64>("MOTION_SPRING_STIFFNESS") {
            self.spring.stiffness = v;
        }
        if let Some(v) = env_parse::<f64>("MOTION_SPRING_DAMPING") {
            self.spring.damping = v;
        }
        if let Some(v) = env_parse::<f64>("MOTION_SPRING_PRECISION") {
            self.spring.precision = v;
        }
        if let Some(v) = env_parse::<f64>("MOTION_TWEEN_DURATION_MS") {
            self.tween.duration_ms = v;
        }
        if let Some(v) = env_parse::<usize>("MOTION_PROPAGATION_DEPTH") {
            self.propagation.depth = v;
        }
        if let Some(v) = env_parse::<u32>("MOTION_FRAME_RATE") {
            self.clock.frame_rate = v;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from motion.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Length of one frame at the configured frame rate, in seconds.
    pub fn frame_seconds(&self) -> f64 {
        1.0 / f64::from(self.clock.frame_rate.max(1))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}
