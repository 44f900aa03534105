//! USB bulk endpoint backend.
//!
//! Used when no kernel driver is loaded. Requires libusb on the host.

use super::{ByteSource, SourceError};
use rusb::{Context, DeviceHandle, Direction, UsbContext};
use std::time::Duration;

/// RNG addressed directly over USB.
///
/// Reads come from the first endpoint of the first interface of the
/// active configuration.
pub struct UsbEndpoint {
    handle: DeviceHandle<Context>,
    interface: u8,
    address: u8,
    timeout: Duration,
    vid: u16,
    pid: u16,
}

impl UsbEndpoint {
    /// Finds the device by vendor and product ID and claims its interface.
    pub fn open(vid: u16, pid: u16, timeout: Duration) -> Result<Self, SourceError> {
        let context = Context::new()?;
        let mut handle = context
            .open_device_with_vid_pid(vid, pid)
            .ok_or(SourceError::DeviceNotFound { vid, pid })?;

        let config = handle.device().active_config_descriptor()?;
        let interface = config
            .interfaces()
            .next()
            .ok_or(SourceError::MissingDescriptor("interface"))?;
        let descriptor = interface
            .descriptors()
            .next()
            .ok_or(SourceError::MissingDescriptor("interface descriptor"))?;
        let endpoint = descriptor
            .endpoint_descriptors()
            .next()
            .ok_or(SourceError::MissingDescriptor("endpoint"))?;

        let interface_number = descriptor.interface_number();
        let address = endpoint.address();
        if endpoint.direction() != Direction::In {
            tracing::warn!(address, "First endpoint is not an IN endpoint");
        }

        // Not supported on every platform; claiming still works there.
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            tracing::debug!(error = %e, "Kernel driver auto-detach unavailable");
        }
        handle.claim_interface(interface_number)?;

        tracing::info!(
            vid = format_args!("{vid:04x}"),
            pid = format_args!("{pid:04x}"),
            interface = interface_number,
            endpoint = address,
            "Opened USB endpoint"
        );

        Ok(Self {
            handle,
            interface: interface_number,
            address,
            timeout,
            vid,
            pid,
        })
    }
}

impl ByteSource for UsbEndpoint {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        let mut buf = vec![0u8; max];
        let n = match self.handle.read_bulk(self.address, &mut buf, self.timeout) {
            Ok(n) => n,
            Err(rusb::Error::Timeout) => return Err(SourceError::Timeout(self.timeout)),
            Err(e) => return Err(SourceError::Usb(e)),
        };
        buf.truncate(n);
        Ok(buf)
    }

    fn describe(&self) -> String {
        format!(
            "USB device {:04x}:{:04x} endpoint 0x{:02x}",
            self.vid, self.pid, self.address
        )
    }
}

impl std::fmt::Debug for UsbEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbEndpoint")
            .field("vid", &format_args!("{:04x}", self.vid))
            .field("pid", &format_args!("{:04x}", self.pid))
            .field("interface", &self.interface)
            .field("address", &self.address)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Drop for UsbEndpoint {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(self.interface) {
            tracing::debug!(error = %e, "Failed to release USB interface");
        }
    }
}
