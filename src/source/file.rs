//! Character device backend.

use super::{ByteSource, SourceError};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// RNG exposed by its kernel driver as a character device.
///
/// The driver arbitrates access to the USB endpoint, so reads here
/// are plain blocking file reads.
pub struct DeviceFile {
    path: PathBuf,
    file: File,
}

impl DeviceFile {
    /// Opens the device for binary reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Opened character device");
        Ok(Self { path, file })
    }
}

impl ByteSource for DeviceFile {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        let mut buf = vec![0u8; max];
        loop {
            match self.file.read(&mut buf) {
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(buf);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SourceError::Read(e)),
            }
        }
    }

    fn describe(&self) -> String {
        format!("character device {}", self.path.display())
    }
}

impl std::fmt::Debug for DeviceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
