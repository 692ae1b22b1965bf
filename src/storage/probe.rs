use std::fs;
use std::path::Path;
use crate::core::error::{Error, ErrorKind, Result};

/// Measures file lengths from metadata, never reading content
pub struct FileSizeProbe;

impl FileSizeProbe {
    pub fn size_of<P: AsRef<Path>>(path: P) -> Result<u64> {
        let metadata = fs::metadata(path.as_ref())?;
        if !metadata.is_file() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("{} is not a regular file", path.as_ref().display()),
            ));
        }
        Ok(metadata.len())
    }

    /// Size in bytes, 0 when the file is missing or not a regular file
    pub fn size_or_zero<P: AsRef<Path>>(path: P) -> u64 {
        Self::size_of(path).unwrap_or(0)
    }
}
