use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Serialize, Deserialize};
use crate::core::error::Result;

/// Database statistics for monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamStats {
    // Catalog
    pub stream_count: u64,
    pub real_stream_count: usize,
    pub anomaly_count: usize,
    pub max_file_size: u64,
    pub db_size_bits: u64,

    // Handle pool
    pub handle_pool_capacity: usize,
    pub handle_pool_available: usize,

    // Reads
    pub stream_reads: u64,
    pub aggregated_reads: u64,
    pub bytes_served: u64,
}

impl StreamStats {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Read counters shared by the stream and aggregated readers
#[derive(Debug, Default)]
pub struct ReadCounters {
    stream_reads: AtomicU64,
    aggregated_reads: AtomicU64,
    bytes_served: AtomicU64,
}

impl ReadCounters {
    pub fn record_stream_read(&self, bytes: usize) {
        self.stream_reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_served.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_aggregated_read(&self) {
        self.aggregated_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stream_reads(&self) -> u64 {
        self.stream_reads.load(Ordering::Relaxed)
    }

    pub fn aggregated_reads(&self) -> u64 {
        self.aggregated_reads.load(Ordering::Relaxed)
    }

    pub fn bytes_served(&self) -> u64 {
        self.bytes_served.load(Ordering::Relaxed)
    }
}
