use std::sync::Arc;
use tracing::info;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::stats::{ReadCounters, StreamStats};
use crate::core::types::{CatalogMode, StreamId};
use crate::memory::pool::HandlePool;
use crate::reader::aggregated::AggregatedReader;
use crate::reader::stream_reader::{Stream, StreamReader};
use crate::storage::catalog::{Catalog, StreamCatalog};

/// What the query engine needs from a stream database
pub trait DatabaseHandler: Send + Sync {
    fn get_catalog(&self, mode: CatalogMode) -> String;

    fn db_size_bits(&self) -> u64;

    fn stream_count(&self) -> u64;

    fn max_file_size(&self) -> u64;

    fn open_stream(&self, id: StreamId, offset: u64) -> Result<Stream<'_>>;

    /// Always fills the whole buffer, zero-padded
    fn read_stream(&self, stream: &mut Stream<'_>, buf: &mut [u8]);

    fn close_stream(&self, stream: Stream<'_>);

    fn read_aggregated_stream(
        &self,
        group: u64,
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
        out: &mut [u8],
    ) -> Result<()>;
}

pub struct StreamDatabase {
    config: Config,
    catalog: Arc<Catalog>,
    pool: Arc<HandlePool>,
    counters: Arc<ReadCounters>,
    aggregated: AggregatedReader,
}

impl StreamDatabase {
    /// Scan the configured directory and set up the handle pool and readers.
    /// An unreadable directory yields an all-fake catalog, not an error.
    pub fn open(config: Config) -> Result<Self> {
        let catalog = Arc::new(StreamCatalog::build(
            config.database_dir.clone(),
            config.stream_count,
        ));
        let pool = Arc::new(HandlePool::new(
            config.handle_pool_size,
            config.handle_wait_timeout(),
        )?);
        let counters = Arc::new(ReadCounters::default());

        let reader = StreamReader::new(catalog.clone(), pool.clone(), counters.clone());
        let aggregated = AggregatedReader::new(reader, config.read_threads)?;

        info!(
            dir = %config.database_dir.display(),
            streams = catalog.stream_count(),
            handles = pool.capacity(),
            "stream database opened"
        );

        Ok(StreamDatabase { config, catalog, pool, counters, aggregated })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn reader(&self) -> &StreamReader {
        self.aggregated.stream_reader()
    }

    pub fn aggregated_reader(&self) -> &AggregatedReader {
        &self.aggregated
    }

    pub fn read_stream_at(&self, id: StreamId, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.reader().read_stream_at(id, offset, len)
    }

    pub fn read_groups(
        &self,
        groups: &[u64],
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
    ) -> Result<Vec<Vec<u8>>> {
        self.aggregated.read_groups(groups, alpha, offset, bytes_per_file)
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            stream_count: self.catalog.stream_count(),
            real_stream_count: self.catalog.real_stream_count(),
            anomaly_count: self.catalog.anomalies().len(),
            max_file_size: self.catalog.max_file_size(),
            db_size_bits: self.catalog.db_size_bits(),
            handle_pool_capacity: self.pool.capacity(),
            handle_pool_available: self.pool.available(),
            stream_reads: self.counters.stream_reads(),
            aggregated_reads: self.counters.aggregated_reads(),
            bytes_served: self.counters.bytes_served(),
        }
    }
}

impl DatabaseHandler for StreamDatabase {
    fn get_catalog(&self, mode: CatalogMode) -> String {
        self.catalog.get_catalog(mode)
    }

    fn db_size_bits(&self) -> u64 {
        self.catalog.db_size_bits()
    }

    fn stream_count(&self) -> u64 {
        self.catalog.stream_count()
    }

    fn max_file_size(&self) -> u64 {
        self.catalog.max_file_size()
    }

    fn open_stream(&self, id: StreamId, offset: u64) -> Result<Stream<'_>> {
        self.reader().open_stream(id, offset)
    }

    fn read_stream(&self, stream: &mut Stream<'_>, buf: &mut [u8]) {
        self.reader().read_stream_into(stream, buf)
    }

    fn close_stream(&self, stream: Stream<'_>) {
        self.reader().close_stream(stream)
    }

    fn read_aggregated_stream(
        &self,
        group: u64,
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
        out: &mut [u8],
    ) -> Result<()> {
        self.aggregated.read_aggregated_stream(group, alpha, offset, bytes_per_file, out)
    }
}
