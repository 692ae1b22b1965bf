use std::fmt::Write;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, Result};
use crate::core::types::{CatalogMode, LogicalStream};

// Catalog text encoding, one value per line:
//   verbose: 0, count, then (name, size) per stream
//   compact: 1, count, max file size

pub fn encode_verbose(stream_count: u64, streams: impl Iterator<Item = LogicalStream>) -> String {
    let mut buf = String::new();
    let _ = writeln!(buf, "{}", CatalogMode::Verbose.selector());
    let _ = writeln!(buf, "{}", stream_count);
    for stream in streams {
        let _ = writeln!(buf, "{}", stream.id);
        let _ = writeln!(buf, "{}", stream.size_bytes);
    }
    buf
}

pub fn encode_compact(stream_count: u64, max_file_size: u64) -> String {
    format!(
        "{}\n{}\n{}\n",
        CatalogMode::Compact.selector(),
        stream_count,
        max_file_size
    )
}

/// One (name, size) pair of a verbose catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// A catalog as seen by a client after decoding the wire text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescription {
    pub mode: CatalogMode,
    pub stream_count: u64,
    pub entries: Vec<CatalogEntry>,    // Empty in compact mode
    pub max_file_size: u64,            // Derived from the entries in verbose mode
}

impl CatalogDescription {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();

        let selector: u8 = parse_field(lines.next(), "selector")?;
        let mode = CatalogMode::from_selector(selector)?;
        let stream_count: u64 = parse_field(lines.next(), "stream count")?;

        let description = match mode {
            CatalogMode::Compact => {
                let max_file_size = parse_field(lines.next(), "max file size")?;
                CatalogDescription { mode, stream_count, entries: Vec::new(), max_file_size }
            }
            CatalogMode::Verbose => {
                let mut entries = Vec::new();
                for _ in 0..stream_count {
                    let name = lines
                        .next()
                        .ok_or_else(|| Error::parse("catalog truncated before stream name"))?
                        .to_string();
                    let size_bytes = parse_field(lines.next(), "stream size")?;
                    entries.push(CatalogEntry { name, size_bytes });
                }
                let max_file_size = entries.iter().map(|e| e.size_bytes).max().unwrap_or(0);
                CatalogDescription { mode, stream_count, entries, max_file_size }
            }
        };

        if lines.any(|line| !line.is_empty()) {
            return Err(Error::parse("trailing data after catalog"));
        }

        Ok(description)
    }
}

fn parse_field<T: std::str::FromStr>(line: Option<&str>, what: &str) -> Result<T> {
    let line = line.ok_or_else(|| Error::parse(format!("catalog truncated before {}", what)))?;
    line.trim()
        .parse()
        .map_err(|_| Error::parse(format!("invalid {}: '{}'", what, line)))
}
