use std::path::{Path, PathBuf};
use crate::core::types::{CatalogAnomaly, StreamId};

/// Directory structure of the stream database
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // One file per real stream, named by its ordinal
}

/// How a directory entry name relates to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryName {
    Stream(StreamId),
    Anomaly(CatalogAnomaly),
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        StorageLayout { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn stream_path(&self, id: StreamId) -> PathBuf {
        self.base_dir.join(id.name())
    }

    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Map a file name onto a stream id. Only canonical decimal ordinals below
    /// `stream_count` are accepted; "007", "+7" and "7.bin" are anomalies.
    pub fn classify_name(name: &str, stream_count: u64) -> EntryName {
        let canonical = !name.is_empty()
            && name.bytes().all(|b| b.is_ascii_digit())
            && (name == "0" || !name.starts_with('0'));

        if !canonical {
            return EntryName::Anomaly(CatalogAnomaly::NonNumericName { name: name.to_string() });
        }

        match name.parse::<u64>() {
            Ok(index) if index < stream_count => EntryName::Stream(StreamId(index)),
            Ok(index) => EntryName::Anomaly(CatalogAnomaly::OutOfRange {
                name: name.to_string(),
                index,
            }),
            // Too many digits for u64: necessarily past the end
            Err(_) => EntryName::Anomaly(CatalogAnomaly::OutOfRange {
                name: name.to_string(),
                index: u64::MAX,
            }),
        }
    }
}
