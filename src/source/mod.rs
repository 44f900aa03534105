//! Hardware RNG byte sources.
//!
//! The RNG is reached either through the character device created by
//! its kernel driver or, when no driver is loaded, directly through the
//! USB bulk endpoint. Both backends expose the same blocking
//! read-up-to-N-bytes capability.

mod device;
mod file;
mod mock;
mod reader;
#[cfg(feature = "usb")]
mod usb;

pub use device::RngDevice;
pub use file::DeviceFile;
pub use mock::MockSource;
pub use reader::{ByteSource, SourceError};
#[cfg(feature = "usb")]
pub use usb::UsbEndpoint;
