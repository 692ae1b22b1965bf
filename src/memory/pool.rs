use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::trace;
use crate::core::error::{Error, ErrorKind, Result};

/// Reusable file handle slot. Created only by `HandlePool::new`.
#[derive(Debug)]
pub struct FileHandle {
    slot: usize,
    file: Option<File>,
}

impl FileHandle {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Open `path` read-only and position it at `offset`.
    /// Seeking past the end is allowed; reads there return nothing.
    pub fn open(&mut self, path: &Path, offset: u64) -> io::Result<()> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        self.file = Some(file);
        Ok(())
    }

    pub fn file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    pub fn close(&mut self) {
        self.file = None;
    }
}

/// Fixed-capacity pool of file handle slots, bounding open descriptors.
///
/// Free slots sit in a bounded lock-free queue; borrowing waits at most
/// `wait_timeout` before failing with `PoolExhausted`.
pub struct HandlePool {
    free_tx: Sender<FileHandle>,
    free_rx: Receiver<FileHandle>,
    capacity: usize,
    wait_timeout: Duration,
    in_use: AtomicUsize,
}

impl HandlePool {
    /// Fails with `InvalidArgument` for a zero capacity: such a pool could
    /// never lend a slot.
    pub fn new(capacity: usize, wait_timeout: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument("handle pool needs at least one slot"));
        }

        let (free_tx, free_rx) = bounded(capacity);

        for slot in 0..capacity {
            // Cannot fail: the queue has room for exactly `capacity` slots
            let _ = free_tx.try_send(FileHandle { slot, file: None });
        }

        Ok(HandlePool {
            free_tx,
            free_rx,
            capacity,
            wait_timeout,
            in_use: AtomicUsize::new(0),
        })
    }

    /// Take a slot, waiting up to the configured timeout
    pub fn borrow(&self) -> Result<PooledHandle<'_>> {
        let handle = if self.wait_timeout.is_zero() {
            self.free_rx.try_recv().ok()
        } else {
            self.free_rx.recv_timeout(self.wait_timeout).ok()
        };

        handle.map(|h| self.lend(h)).ok_or_else(|| {
            Error::new(
                ErrorKind::PoolExhausted,
                format!(
                    "all {} file handles in use after waiting {:?}",
                    self.capacity, self.wait_timeout
                ),
            )
        })
    }

    /// Take a slot only if one is free right now
    pub fn try_borrow(&self) -> Option<PooledHandle<'_>> {
        self.free_rx.try_recv().ok().map(|h| self.lend(h))
    }

    /// Return a slot explicitly; equivalent to dropping it
    pub fn release(&self, handle: PooledHandle<'_>) {
        drop(handle);
    }

    fn lend(&self, handle: FileHandle) -> PooledHandle<'_> {
        self.in_use.fetch_add(1, Ordering::AcqRel);
        trace!(slot = handle.slot, "file handle borrowed");
        PooledHandle { pool: self, handle: Some(handle) }
    }

    fn give_back(&self, mut handle: FileHandle) {
        handle.close();
        trace!(slot = handle.slot, "file handle returned");
        self.in_use.fetch_sub(1, Ordering::AcqRel);
        // Never full: only slots taken from this queue come back to it
        let _ = self.free_tx.try_send(handle);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.free_rx.len()
    }

    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }
}

/// Exclusive loan of a pool slot; returns to the pool (closed) on drop
pub struct PooledHandle<'a> {
    pool: &'a HandlePool,
    handle: Option<FileHandle>,
}

impl Deref for PooledHandle<'_> {
    type Target = FileHandle;

    fn deref(&self) -> &FileHandle {
        // Only `None` while dropping
        self.handle.as_ref().expect("pooled handle already returned")
    }
}

impl DerefMut for PooledHandle<'_> {
    fn deref_mut(&mut self) -> &mut FileHandle {
        self.handle.as_mut().expect("pooled handle already returned")
    }
}

impl Drop for PooledHandle<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.give_back(handle);
        }
    }
}
