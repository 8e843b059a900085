//! Project creation parameters, optionally read from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_FRAME_RATE: u32 = 24;
pub const DEFAULT_FRAME_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: u32 },
    #[error("invalid value for {var}: {value:?}")]
    Parse { var: &'static str, value: String },
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "E_CONFIG_NON_POSITIVE",
            Self::Parse { .. } => "E_CONFIG_PARSE",
        }
    }
}

/// Canvas size, frame rate and initial frame count, fixed at project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub frame_count: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: DEFAULT_FRAME_RATE,
            frame_count: DEFAULT_FRAME_COUNT,
        }
    }
}

impl ProjectConfig {
    /// Validated config.
    ///
    /// # Errors
    ///
    /// Returns `NonPositive` for the first field that is zero.
    pub fn new(width: u32, height: u32, frame_rate: u32, frame_count: u32) -> Result<Self, ConfigError> {
        for (field, value) in [("width", width), ("height", height), ("frame_rate", frame_rate), ("frame_count", frame_count)] {
            if value == 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(Self { width, height, frame_rate, frame_count })
    }

    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FLIPBOOK_WIDTH`: default 800
    /// - `FLIPBOOK_HEIGHT`: default 600
    /// - `FLIPBOOK_FPS`: default 24
    /// - `FLIPBOOK_FRAMES`: default 10
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a value that is not an unsigned integer and
    /// `NonPositive` for a zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|raw| raw.to_string_lossy().into_owned()))
    }

    /// Like [`ProjectConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ProjectConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let width = parse_u32(&lookup, "FLIPBOOK_WIDTH", DEFAULT_WIDTH)?;
        let height = parse_u32(&lookup, "FLIPBOOK_HEIGHT", DEFAULT_HEIGHT)?;
        let frame_rate = parse_u32(&lookup, "FLIPBOOK_FPS", DEFAULT_FRAME_RATE)?;
        let frame_count = parse_u32(&lookup, "FLIPBOOK_FRAMES", DEFAULT_FRAME_COUNT)?;
        Self::new(width, height, frame_rate, frame_count)
    }
}

fn parse_u32<F>(lookup: &F, var: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Parse { var, value: raw }),
    }
}
