use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::core::error::Result;

/// Default database directory, relative to the server's working directory
pub const DEFAULT_DIR_NAME: &str = "db/";

/// Number of reusable file handle slots
pub const NB_FILE_DESCRIPTORS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_dir: PathBuf,
    pub stream_count: u64,

    pub handle_pool_size: usize,        // HandlePool capacity
    pub handle_wait_timeout_ms: u64,    // 0 = fail immediately when the pool is empty

    pub read_threads: usize,            // Workers for parallel group reads
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_dir: PathBuf::from(DEFAULT_DIR_NAME),
            stream_count: 0,
            handle_pool_size: NB_FILE_DESCRIPTORS,
            handle_wait_timeout_ms: 5_000,
            read_threads: num_cpus::get(),
        }
    }
}

impl Config {
    pub fn new(database_dir: impl Into<PathBuf>, stream_count: u64) -> Self {
        Config {
            database_dir: database_dir.into(),
            stream_count,
            ..Config::default()
        }
    }

    pub fn with_handle_pool_size(mut self, size: usize) -> Self {
        self.handle_pool_size = size;
        self
    }

    pub fn with_handle_wait_timeout(mut self, timeout: Duration) -> Self {
        self.handle_wait_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_read_threads(mut self, threads: usize) -> Self {
        self.read_threads = threads;
        self
    }

    pub fn handle_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.handle_wait_timeout_ms)
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
