use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::trace;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::StreamId;
use crate::reader::stream_reader::StreamReader;

/// Reads `alpha` consecutive logical streams as one physical unit.
///
/// Group `g` covers streams `[g * alpha, g * alpha + alpha)`, clamped to the
/// catalog. Stream `i` lands in slot `i % alpha` of the output; slots with no
/// logical stream behind them are zero-filled. Each call works on its own
/// output buffer, so groups are read concurrently without a shared lock.
pub struct AggregatedReader {
    reader: StreamReader,
    threads: ThreadPool,
}

impl AggregatedReader {
    pub fn new(reader: StreamReader, read_threads: usize) -> Result<Self> {
        let threads = ThreadPoolBuilder::new()
            .num_threads(read_threads)
            .thread_name(|i| format!("stream-reader-{}", i))
            .build()
            .map_err(|e| Error::new(ErrorKind::InvalidState, format!("read pool: {}", e)))?;

        Ok(AggregatedReader { reader, threads })
    }

    pub fn stream_reader(&self) -> &StreamReader {
        &self.reader
    }

    /// Bytes read per stream: `bytes_per_file`, capped by what remains of the
    /// largest file after `offset`
    pub fn file_byte_size(&self, offset: u64, bytes_per_file: u64) -> u64 {
        let max = self.reader.catalog().max_file_size();
        bytes_per_file.min(max.saturating_sub(offset))
    }

    /// Output length of one group read
    pub fn group_len(&self, alpha: u64, offset: u64, bytes_per_file: u64) -> Result<usize> {
        if alpha == 0 {
            return Err(Error::invalid_argument("aggregation factor alpha must be positive"));
        }
        alpha
            .checked_mul(self.file_byte_size(offset, bytes_per_file))
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| Error::invalid_argument("aggregated group does not fit in memory"))
    }

    pub fn read_aggregated_stream(
        &self,
        group: u64,
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
        out: &mut [u8],
    ) -> Result<()> {
        let group_len = self.group_len(alpha, offset, bytes_per_file)?;
        if out.len() < group_len {
            return Err(Error::invalid_argument(format!(
                "output buffer of {} bytes, group needs {}",
                out.len(),
                group_len
            )));
        }

        // group_len fits in usize, so the per-file size does too
        let file_size = self.file_byte_size(offset, bytes_per_file) as usize;
        let stream_count = self.reader.catalog().stream_count();
        let start = group.saturating_mul(alpha);
        let end = start.saturating_add(alpha).min(stream_count);

        for i in start..end {
            let slot = (i % alpha) as usize;
            let chunk = &mut out[slot * file_size..(slot + 1) * file_size];

            let mut stream = self.reader.open_stream(StreamId(i), offset)?;
            self.reader.read_stream_into(&mut stream, chunk);
            self.reader.close_stream(stream);
        }

        let valid = end.saturating_sub(start) as usize;
        if valid < alpha as usize {
            trace!(group, padding_streams = alpha as usize - valid, "padding past catalog end");
            out[valid * file_size..group_len].fill(0);
        }

        self.reader.counters().record_aggregated_read();
        Ok(())
    }

    pub fn read_aggregated_stream_vec(
        &self,
        group: u64,
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
    ) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.group_len(alpha, offset, bytes_per_file)?];
        self.read_aggregated_stream(group, alpha, offset, bytes_per_file, &mut out)?;
        Ok(out)
    }

    /// Read several groups in parallel, one group per worker at a time.
    /// Results follow the order of `groups`.
    pub fn read_groups(
        &self,
        groups: &[u64],
        alpha: u64,
        offset: u64,
        bytes_per_file: u64,
    ) -> Result<Vec<Vec<u8>>> {
        self.threads.install(|| {
            groups
                .par_iter()
                .map(|&group| self.read_aggregated_stream_vec(group, alpha, offset, bytes_per_file))
                .collect()
        })
    }
}
