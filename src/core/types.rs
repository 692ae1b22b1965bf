use serde::{Serialize, Deserialize};
use std::fmt;
use crate::core::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId(pub u64);

impl StreamId {
    pub fn new(id: u64) -> Self {
        StreamId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// On-disk and catalog name: the decimal ordinal
    pub fn name(&self) -> String {
        self.0.to_string()
    }
}

impl From<u64> for StreamId {
    fn from(id: u64) -> Self {
        StreamId(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One addressable slot of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalStream {
    pub id: StreamId,
    pub is_real: bool,
    pub size_bytes: u64,    // 0 for fake streams
}

impl LogicalStream {
    pub fn real(id: StreamId, size_bytes: u64) -> Self {
        LogicalStream { id, is_real: true, size_bytes }
    }

    pub fn fake(id: StreamId) -> Self {
        LogicalStream { id, is_real: false, size_bytes: 0 }
    }
}

/// Catalog wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogMode {
    /// Selector `0`: every stream's name and size
    Verbose,
    /// Selector `1`: stream count and maximum file size
    Compact,
}

impl CatalogMode {
    pub fn selector(&self) -> u8 {
        match self {
            CatalogMode::Verbose => 0,
            CatalogMode::Compact => 1,
        }
    }

    pub fn from_selector(selector: u8) -> Result<Self> {
        match selector {
            0 => Ok(CatalogMode::Verbose),
            1 => Ok(CatalogMode::Compact),
            other => Err(Error::parse(format!("unknown catalog selector {}", other))),
        }
    }
}

/// Legacy flag: `true` asks for the verbose catalog
impl From<bool> for CatalogMode {
    fn from(verbose: bool) -> Self {
        if verbose { CatalogMode::Verbose } else { CatalogMode::Compact }
    }
}

/// Directory entry that does not map onto a served stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogAnomaly {
    NonNumericName { name: String },
    OutOfRange { name: String, index: u64 },
    NotRegularFile { name: String },
    Unreadable { name: String, reason: String },
}

impl CatalogAnomaly {
    pub fn name(&self) -> &str {
        match self {
            CatalogAnomaly::NonNumericName { name }
            | CatalogAnomaly::OutOfRange { name, .. }
            | CatalogAnomaly::NotRegularFile { name }
            | CatalogAnomaly::Unreadable { name, .. } => name,
        }
    }
}

impl fmt::Display for CatalogAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogAnomaly::NonNumericName { name } => {
                write!(f, "'{}' is not a decimal stream ordinal", name)
            }
            CatalogAnomaly::OutOfRange { name, index } => {
                write!(f, "'{}' maps to stream {} beyond the catalog", name, index)
            }
            CatalogAnomaly::NotRegularFile { name } => write!(f, "'{}' is not a regular file", name),
            CatalogAnomaly::Unreadable { name, reason } => write!(f, "'{}' unreadable: {}", name, reason),
        }
    }
}
