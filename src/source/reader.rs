//! Byte source abstraction.
//!
//! This module provides a trait-based abstraction over the RNG
//! hardware, allowing the sampler to run against the real device or a
//! mock implementation for testing.

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reading from a byte source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No device file, and no USB device with these identifiers.
    #[error("no USB device found with VID {vid:04x} and PID {pid:04x}")]
    DeviceNotFound {
        /// Vendor ID searched for.
        vid: u16,
        /// Product ID searched for.
        pid: u16,
    },
    /// The device file exists but could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Device file path.
        path: PathBuf,
        /// Underlying open error.
        #[source]
        source: io::Error,
    },
    /// A read from the device failed.
    #[error("device read failed: {0}")]
    Read(#[from] io::Error),
    /// A USB read hit its timeout.
    #[error("device read timed out after {0:?}")]
    Timeout(Duration),
    /// The device returned zero bytes.
    #[error("device returned no data")]
    Exhausted,
    /// No device file, and USB support is not built in.
    #[error("{} does not exist and USB support was not compiled in", path.display())]
    UsbUnsupported {
        /// Device file path that was missing.
        path: PathBuf,
    },
    /// The USB device lacks the interface or endpoint to read from.
    #[error("USB device has no {0}")]
    MissingDescriptor(&'static str),
    /// libusb reported an error.
    #[cfg(feature = "usb")]
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
    /// The device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Trait for RNG byte sources.
pub trait ByteSource {
    /// Reads up to `max` bytes, blocking until some are available.
    ///
    /// An empty result means the source has no more data.
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError>;

    /// Human-readable description for logging.
    fn describe(&self) -> String;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        (**self).read_block(max)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        (**self).read_block(max)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
