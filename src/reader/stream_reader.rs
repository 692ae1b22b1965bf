use std::fs::File;
use std::io::{self, Read, Seek};
use std::sync::Arc;
use tracing::{debug, trace};
use crate::core::error::{Error, Result};
use crate::core::stats::ReadCounters;
use crate::core::types::StreamId;
use crate::memory::pool::{HandlePool, PooledHandle};
use crate::storage::catalog::Catalog;

/// An opened logical stream. Holds a pool slot whether real or fake,
/// so every stream costs the same slot until `close_stream`.
pub struct Stream<'a> {
    id: StreamId,
    handle: PooledHandle<'a>,
}

impl Stream<'_> {
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Whether a backing file is open. Fake or vanished files report false.
    pub fn is_real(&self) -> bool {
        self.handle.is_open()
    }
}

/// Opens, reads with zero padding, and closes single logical streams
#[derive(Clone)]
pub struct StreamReader {
    catalog: Arc<Catalog>,
    pool: Arc<HandlePool>,
    counters: Arc<ReadCounters>,
}

impl StreamReader {
    pub fn new(catalog: Arc<Catalog>, pool: Arc<HandlePool>, counters: Arc<ReadCounters>) -> Self {
        StreamReader { catalog, pool, counters }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pool(&self) -> &HandlePool {
        &self.pool
    }

    pub fn counters(&self) -> &ReadCounters {
        &self.counters
    }

    pub fn open_stream(&self, id: StreamId, offset: u64) -> Result<Stream<'_>> {
        if !self.catalog.contains(id) {
            return Err(Error::invalid_argument(format!(
                "stream {} outside catalog of {} streams",
                id,
                self.catalog.stream_count()
            )));
        }

        let mut handle = self.pool.borrow()?;

        if let Some(path) = self.catalog.real_path(id) {
            // A file that vanished since the scan is served as a fake stream
            if let Err(e) = handle.open(&path, offset) {
                debug!(stream = %id, error = %e, "real stream unavailable, serving zeros");
            }
        }

        trace!(stream = %id, offset, slot = handle.slot(), "stream opened");
        Ok(Stream { id, handle })
    }

    /// Read exactly `requested` bytes: file content from the stream position,
    /// then zeros.
    pub fn read_stream(&self, stream: &mut Stream<'_>, requested: usize) -> Vec<u8> {
        let mut buf = vec![0u8; requested];
        self.read_stream_into(stream, &mut buf);
        buf
    }

    /// Fill all of `buf`, zero-padding past the end of the file
    pub fn read_stream_into(&self, stream: &mut Stream<'_>, buf: &mut [u8]) {
        match stream.handle.file_mut() {
            Some(file) => match fill_from(file, buf) {
                Ok(filled) => buf[filled..].fill(0),
                Err(e) => {
                    debug!(stream = %stream.id, error = %e, "read failed, serving zeros");
                    buf.fill(0);
                }
            },
            None => buf.fill(0),
        }
        self.counters.record_stream_read(buf.len());
    }

    /// Close the file (if any) and return the slot to the pool
    pub fn close_stream(&self, stream: Stream<'_>) {
        trace!(stream = %stream.id, "stream closed");
        self.pool.release(stream.handle);
    }

    /// Open, read `len` bytes from `offset`, close
    pub fn read_stream_at(&self, id: StreamId, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut stream = self.open_stream(id, offset)?;
        let data = self.read_stream(&mut stream, len);
        self.close_stream(stream);
        Ok(data)
    }
}

/// Read what remains between the file position and end of file, at most
/// `buf.len()` bytes. Short reads are retried until EOF.
fn fill_from(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let end = file.metadata()?.len();
    let pos = file.stream_position()?;
    let remaining = end.saturating_sub(pos);
    let wanted = remaining.min(buf.len() as u64) as usize;

    let mut filled = 0;
    while filled < wanted {
        match file.read(&mut buf[filled..wanted]) {
            Ok(0) => break,     // File shrank since the size check
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
