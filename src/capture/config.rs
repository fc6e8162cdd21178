//! Capture and session configuration.
//!
//! The classifier assumes a fixed frame geometry for the whole session;
//! block sizes and the target rectangle are derived from it once at start.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for frame capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 20,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Frame width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-120 fps.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// A block size is zero or larger than the frame.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(u32),
    /// Target rectangle does not fit the frame.
    #[error("invalid target size: {0}")]
    InvalidTargetSize(u32),
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// Config file could not be parsed.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Classification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Side length of a classification block in pixels.
    pub block_size: u32,
    /// Side length of the coarse tiles sampled by capture-background.
    pub background_block: u32,
    /// Side length of the central target square used by capture-object
    /// and add-class.
    pub target_size: u32,
    /// Minimum Euclidean distance between display colors in the palette.
    pub min_color_distance: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            block_size: 16,
            background_block: 128,
            target_size: 50,
            min_color_distance: 50.0,
        }
    }
}

impl ClassifyConfig {
    /// Validates the classification parameters against a frame geometry.
    pub fn validate(&self, capture: &CaptureConfig) -> Result<(), ConfigError> {
        for block in [self.block_size, self.background_block] {
            if block == 0 || block > capture.width || block > capture.height {
                return Err(ConfigError::InvalidBlockSize(block));
            }
        }
        if self.target_size == 0
            || self.target_size > capture.width
            || self.target_size > capture.height
        {
            return Err(ConfigError::InvalidTargetSize(self.target_size));
        }
        Ok(())
    }
}

/// Session pacing and demo-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tick interval in milliseconds; paces the frame rate and bounds
    /// command latency.
    pub tick_ms: u64,
    /// Run continuously (true) or process a fixed number of ticks (false).
    pub continuous: bool,
    /// Number of ticks to run if not continuous.
    pub tick_count: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50, // ~20 fps, matches the capture default
            continuous: false,
            tick_count: 100,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Frame acquisition settings.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Classification settings.
    #[serde(default)]
    pub classify: ClassifyConfig,
    /// Session pacing settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        config.classify.validate(&config.capture)?;
        Ok(config)
    }
}
