//! Device and analysis configuration.
//!
//! Both binaries accept an optional TOML file; command-line flags
//! override whatever the file sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Character device created by the kernel driver.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/pico_rng";

/// Default USB vendor ID of the RNG firmware.
pub const DEFAULT_VID: &str = "0000";

/// Default USB product ID of the RNG firmware.
pub const DEFAULT_PID: &str = "0004";

/// Configuration for opening the RNG device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Character device path, preferred over USB when it exists.
    pub path: PathBuf,
    /// Vendor ID as a hex string.
    pub vid: String,
    /// Product ID as a hex string.
    pub pid: String,
    /// Bulk read timeout in milliseconds.
    pub timeout_ms: u64,
    /// Bytes requested per device read.
    pub block_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DEVICE_PATH),
            vid: DEFAULT_VID.to_string(),
            pid: DEFAULT_PID.to_string(),
            timeout_ms: 500,
            block_size: 64,
        }
    }
}

impl DeviceConfig {
    /// Parsed vendor ID.
    pub fn vendor_id(&self) -> Result<u16, ConfigError> {
        parse_hex_id(&self.vid)
    }

    /// Parsed product ID.
    pub fn product_id(&self) -> Result<u16, ConfigError> {
        parse_hex_id(&self.pid)
    }

    /// USB read timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vendor_id()?;
        self.product_id()?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        Ok(())
    }
}

/// Configuration for the streaming analyzer and its report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bytes per chi-square chunk.
    pub chunk_size: usize,
    /// Number of bins in the chi-square histogram.
    pub chi_square_bins: usize,
    /// Number of bins in the percentage excess histogram.
    pub excess_bins: usize,
    /// Byte values folded into each row of the distribution chart.
    pub values_per_row: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::analysis::DEFAULT_CHUNK_SIZE,
            chi_square_bins: 401,
            excess_bins: 100,
            values_per_row: 1,
        }
    }
}

impl AnalysisConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.chi_square_bins == 0 || self.excess_bins == 0 || self.values_per_row == 0 {
            return Err(ConfigError::InvalidBins);
        }
        Ok(())
    }
}

/// Parses a 16-bit USB identifier written in hex, with or without `0x`.
pub fn parse_hex_id(value: &str) -> Result<u16, ConfigError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidHex(value.to_string()))
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A VID or PID is not valid hex.
    #[error("invalid USB identifier {0:?} (expected up to four hex digits)")]
    InvalidHex(String),
    /// The USB timeout is zero.
    #[error("read timeout must be greater than zero")]
    InvalidTimeout,
    /// The read block size is zero.
    #[error("block size must be greater than zero")]
    InvalidBlockSize,
    /// The analysis chunk size is zero.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    /// A histogram bin count or row width is zero.
    #[error("histogram bin counts must be greater than zero")]
    InvalidBins,
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[device]` table for the sampler.
    #[serde(default)]
    pub device: DeviceConfig,
    /// `[analysis]` table for the analyzer.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.device.validate()?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Loads the file when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
