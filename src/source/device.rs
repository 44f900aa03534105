//! Backend selection.

use super::{ByteSource, DeviceFile, SourceError};
use crate::config::DeviceConfig;

#[cfg(feature = "usb")]
use super::UsbEndpoint;

/// The RNG device, opened through whichever backend is available.
///
/// Chosen once at startup: the character device wins whenever its
/// path exists, since that means a driver already owns the hardware.
#[derive(Debug)]
pub enum RngDevice {
    /// Kernel driver character device.
    DeviceFile(DeviceFile),
    /// Direct USB bulk endpoint.
    #[cfg(feature = "usb")]
    Usb(UsbEndpoint),
}

impl RngDevice {
    /// Opens the device, preferring the character device over USB.
    pub fn open(config: &DeviceConfig) -> Result<Self, SourceError> {
        config.validate()?;

        if config.path.exists() {
            tracing::info!(path = %config.path.display(), "Using character device");
            return Ok(Self::DeviceFile(DeviceFile::open(&config.path)?));
        }

        tracing::info!(
            path = %config.path.display(),
            "Character device not found, falling back to USB"
        );
        Self::open_usb(config)
    }

    #[cfg(feature = "usb")]
    fn open_usb(config: &DeviceConfig) -> Result<Self, SourceError> {
        let endpoint = UsbEndpoint::open(
            config.vendor_id()?,
            config.product_id()?,
            config.timeout(),
        )?;
        Ok(Self::Usb(endpoint))
    }

    #[cfg(not(feature = "usb"))]
    fn open_usb(config: &DeviceConfig) -> Result<Self, SourceError> {
        Err(SourceError::UsbUnsupported {
            path: config.path.clone(),
        })
    }

    /// Short name of the active backend.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::DeviceFile(_) => "device-file",
            #[cfg(feature = "usb")]
            Self::Usb(_) => "usb",
        }
    }
}

impl ByteSource for RngDevice {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        match self {
            Self::DeviceFile(file) => file.read_block(max),
            #[cfg(feature = "usb")]
            Self::Usb(endpoint) => endpoint.read_block(max),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::DeviceFile(file) => file.describe(),
            #[cfg(feature = "usb")]
            Self::Usb(endpoint) => endpoint.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prefers_existing_device_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0xA5u8; 128]).unwrap();
        tmp.flush().unwrap();

        let config = DeviceConfig {
            path: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let mut device = RngDevice::open(&config).unwrap();

        assert_eq!(device.backend(), "device-file");
        assert_eq!(device.read_block(64).unwrap(), vec![0xA5u8; 64]);
    }

    #[test]
    fn test_invalid_ids_rejected_before_open() {
        let config = DeviceConfig {
            vid: "zz".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            RngDevice::open(&config),
            Err(SourceError::Config(_))
        ));
    }

    #[cfg(not(feature = "usb"))]
    #[test]
    fn test_missing_device_without_usb_support() {
        let config = DeviceConfig {
            path: std::path::PathBuf::from("/nonexistent/pico_rng"),
            ..Default::default()
        };
        assert!(matches!(
            RngDevice::open(&config),
            Err(SourceError::UsbUnsupported { .. })
        ));
    }
}
