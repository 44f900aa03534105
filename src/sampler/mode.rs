//! Output mode selection.

use super::SamplerError;

/// Nominal transfer size of the device.
pub const BLOCK_SIZE: usize = 64;

/// What the sampler does with the bytes it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerMode {
    /// Print rolling throughput until interrupted.
    Performance,
    /// Write raw bytes until interrupted or the pipe closes.
    Endless,
    /// Write exactly this many raw bytes.
    Size(u64),
}

impl SamplerMode {
    /// Picks the mode from command-line flags.
    ///
    /// Flags are not mutually exclusive: performance wins over endless,
    /// which wins over size. The size string is only parsed when it is
    /// actually used.
    pub fn select(performance: bool, endless: bool, size: &str) -> Result<Self, SamplerError> {
        if performance {
            Ok(Self::Performance)
        } else if endless {
            Ok(Self::Endless)
        } else {
            Ok(Self::Size(parse_size(size)?))
        }
    }
}

/// Parses a byte count given as a number, possibly fractional.
///
/// The value is truncated toward zero; negative counts mean zero bytes.
pub fn parse_size(value: &str) -> Result<u64, SamplerError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| SamplerError::InvalidSize(value.to_string()))?;
    if !parsed.is_finite() {
        return Err(SamplerError::InvalidSize(value.to_string()));
    }
    Ok(parsed.trunc().max(0.0) as u64)
}

/// Sampler settings.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Output mode.
    pub mode: SamplerMode,
    /// Bytes requested per device read.
    pub block_size: usize,
}

impl SamplerConfig {
    /// Creates a config with the nominal block size.
    pub fn new(mode: SamplerMode) -> Self {
        Self {
            mode,
            block_size: BLOCK_SIZE,
        }
    }

    /// Overrides the block size; zero is bumped to one.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new(SamplerMode::Size(100))
    }
}
