use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{CatalogAnomaly, CatalogMode, LogicalStream, StreamId};
use crate::storage::layout::{EntryName, StorageLayout};
use crate::storage::probe::FileSizeProbe;
use crate::storage::wire;

const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Immutable description of the stream database, built once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
    layout: StorageLayout,
    stream_count: u64,
    real_streams: BTreeMap<StreamId, u64>,  // Served streams and their sizes
    max_file_size: u64,
    regular_file_count: u64,
    anomalies: Vec<CatalogAnomaly>,
}

/// Directory scanner producing a `Catalog`
pub struct StreamCatalog;

impl StreamCatalog {
    /// Scan `dir` once and classify every logical index in `[0, stream_count)`.
    /// Fails with `DirectoryUnavailable` if the directory cannot be listed.
    pub fn scan(dir: impl Into<PathBuf>, stream_count: u64) -> Result<Catalog> {
        let layout = StorageLayout::new(dir);
        let entries = fs::read_dir(layout.base_dir()).map_err(|e| {
            Error::new(
                ErrorKind::DirectoryUnavailable,
                format!("cannot open database directory {}: {}", layout.base_dir().display(), e),
            )
        })?;

        let mut catalog = Catalog::empty(layout, stream_count);
        let mut processed = 0u64;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                info!(processed, "catalog scan in progress");
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            catalog.record_entry(name);
        }

        info!(entries = processed, "catalog scan finished");
        info!(
            db_size_bytes = catalog.max_file_size.saturating_mul(catalog.regular_file_count),
            "database size"
        );
        info!(streams = catalog.stream_count, real = catalog.real_streams.len(), "catalog built");

        Ok(catalog)
    }

    /// Like `scan`, but an unavailable directory is logged and yields a catalog
    /// where every stream is fake.
    pub fn build(dir: impl Into<PathBuf>, stream_count: u64) -> Catalog {
        let dir = dir.into();
        match Self::scan(dir.clone(), stream_count) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "serving an all-fake catalog");
                Catalog::empty(StorageLayout::new(dir), stream_count)
            }
        }
    }
}

impl Catalog {
    fn empty(layout: StorageLayout, stream_count: u64) -> Self {
        Catalog {
            layout,
            stream_count,
            real_streams: BTreeMap::new(),
            max_file_size: 0,
            regular_file_count: 0,
            anomalies: Vec::new(),
        }
    }

    fn record_entry(&mut self, name: String) {
        let path = self.layout.entry_path(&name);

        let size = match FileSizeProbe::size_of(&path) {
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::InvalidArgument => {
                self.report(CatalogAnomaly::NotRegularFile { name });
                return;
            }
            Err(e) => {
                self.report(CatalogAnomaly::Unreadable { name, reason: e.context });
                return;
            }
        };

        // Every regular file feeds the size statistics, served or not
        self.regular_file_count += 1;
        self.max_file_size = self.max_file_size.max(size);

        match StorageLayout::classify_name(&name, self.stream_count) {
            EntryName::Stream(id) => {
                debug!(stream = %id, size, "real stream");
                self.real_streams.insert(id, size);
            }
            EntryName::Anomaly(anomaly) => self.report(anomaly),
        }
    }

    fn report(&mut self, anomaly: CatalogAnomaly) {
        warn!(%anomaly, "directory entry is not served");
        self.anomalies.push(anomaly);
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn stream_count(&self) -> u64 {
        self.stream_count
    }

    /// Largest regular file found in the directory, 0 if none
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn real_stream_count(&self) -> usize {
        self.real_streams.len()
    }

    pub fn regular_file_count(&self) -> u64 {
        self.regular_file_count
    }

    /// Padded database size in bits: every regular file counted at the maximum size
    pub fn db_size_bits(&self) -> u64 {
        self.max_file_size
            .saturating_mul(self.regular_file_count)
            .saturating_mul(8)
    }

    pub fn anomalies(&self) -> &[CatalogAnomaly] {
        &self.anomalies
    }

    pub fn contains(&self, id: StreamId) -> bool {
        id.0 < self.stream_count
    }

    pub fn is_real(&self, id: StreamId) -> bool {
        self.real_streams.contains_key(&id)
    }

    pub fn stream(&self, id: StreamId) -> Option<LogicalStream> {
        if !self.contains(id) {
            return None;
        }
        Some(match self.real_streams.get(&id) {
            Some(&size) => LogicalStream::real(id, size),
            None => LogicalStream::fake(id),
        })
    }

    /// All logical streams in index order
    pub fn streams(&self) -> impl Iterator<Item = LogicalStream> + '_ {
        (0..self.stream_count).map(move |i| {
            let id = StreamId(i);
            match self.real_streams.get(&id) {
                Some(&size) => LogicalStream::real(id, size),
                None => LogicalStream::fake(id),
            }
        })
    }

    /// Path of the backing file, only for real streams
    pub fn real_path(&self, id: StreamId) -> Option<PathBuf> {
        self.is_real(id).then(|| self.layout.stream_path(id))
    }

    pub fn get_catalog(&self, mode: CatalogMode) -> String {
        match mode {
            CatalogMode::Verbose => wire::encode_verbose(self.stream_count, self.streams()),
            CatalogMode::Compact => wire::encode_compact(self.stream_count, self.max_file_size),
        }
    }
}
