//! Session Handle Pool
//!
//! A small, statically bounded table of open-session descriptors. Opening a
//! session creates (or truncates) both stream files for a basename and
//! resets the per-stream record counters; closing syncs and releases both.
//!
//! ## Invariants
//! - At most K sessions open simultaneously; slots are preallocated and the
//!   table never grows. `Capacity` is the only admission control.
//! - Handles carry a generation number; a stale handle (closed, or from a
//!   recycled slot) is rejected with `InvalidHandle`.
//! - `open`/`close`/`append` serialize on the slot-table mutex.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::fs::{FileSystem, StorageFile};
use crate::record::StreamKind;

/// Opaque handle to an open session slot
///
/// Valid from `open` until `close`; any use afterwards fails with
/// `InvalidHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    slot: usize,
    generation: u64,
}

/// One open session: a basename and its two stream files
struct SessionSlot {
    basename: String,
    raw_file: Box<dyn StorageFile>,
    summary_file: Box<dyn StorageFile>,
    raw_count: u64,
    summary_count: u64,
    generation: u64,
}

impl SessionSlot {
    fn file_mut(&mut self, kind: StreamKind) -> &mut Box<dyn StorageFile> {
        match kind {
            StreamKind::Raw => &mut self.raw_file,
            StreamKind::Summary => &mut self.summary_file,
        }
    }

    fn count(&self, kind: StreamKind) -> u64 {
        match kind {
            StreamKind::Raw => self.raw_count,
            StreamKind::Summary => self.summary_count,
        }
    }

    fn bump(&mut self, kind: StreamKind) {
        match kind {
            StreamKind::Raw => self.raw_count += 1,
            StreamKind::Summary => self.summary_count += 1,
        }
    }
}

/// Bounded pool of open write sessions
pub struct SessionPool {
    fs: Arc<dyn FileSystem>,
    mount_dir: PathBuf,

    /// Fixed-length slot table; `None` = free
    slots: Mutex<Vec<Option<SessionSlot>>>,

    /// Generation source for handle validation (never reused)
    next_generation: AtomicU64,
}

impl SessionPool {
    /// Create a pool with `capacity` preallocated slots
    pub fn new(fs: Arc<dyn FileSystem>, mount_dir: PathBuf, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            fs,
            mount_dir,
            slots: Mutex::new(slots),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Open a session: create/truncate both stream files, zero the counters
    ///
    /// Fails with `Capacity` when all slots are in use — the caller must
    /// close an existing session first.
    pub fn open(&self, basename: &str) -> Result<SessionHandle> {
        validate_basename(basename)?;

        let mut slots = self.slots.lock();

        let index = match slots.iter().position(Option::is_none) {
            Some(i) => i,
            None => {
                tracing::warn!(basename, capacity = slots.len(), "session pool full");
                return Err(StoreError::Capacity {
                    capacity: slots.len(),
                });
            }
        };

        let raw_file = self.fs.create(&self.stream_path(basename, StreamKind::Raw))?;
        let summary_file = self
            .fs
            .create(&self.stream_path(basename, StreamKind::Summary))?;

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        slots[index] = Some(SessionSlot {
            basename: basename.to_string(),
            raw_file,
            summary_file,
            raw_count: 0,
            summary_count: 0,
            generation,
        });

        tracing::debug!(basename, slot = index, "session opened");
        Ok(SessionHandle {
            slot: index,
            generation,
        })
    }

    /// Close a session: sync both stream files and free the slot
    ///
    /// The slot is freed even if a sync fails; the handle is invalid either
    /// way.
    pub fn close(&self, handle: SessionHandle) -> Result<()> {
        let mut slot = {
            let mut slots = self.slots.lock();
            let entry = slots.get_mut(handle.slot).ok_or(StoreError::InvalidHandle)?;
            match entry.take() {
                Some(s) if s.generation == handle.generation => s,
                other => {
                    // Not ours — put the occupant back untouched
                    *entry = other;
                    return Err(StoreError::InvalidHandle);
                }
            }
        };

        let raw_sync = slot.raw_file.sync();
        let summary_sync = slot.summary_file.sync();

        tracing::debug!(
            basename = %slot.basename,
            raw_records = slot.raw_count,
            summary_records = slot.summary_count,
            "session closed"
        );

        raw_sync?;
        summary_sync?;
        Ok(())
    }

    /// Append one encoded record to a session stream and bump its counter
    ///
    /// The caller guarantees `bytes.len()` equals the stream's stride; I/O
    /// failures are returned raw for the store to escalate.
    pub fn append(&self, handle: SessionHandle, kind: StreamKind, bytes: &[u8]) -> Result<()> {
        debug_assert_eq!(bytes.len(), kind.stride());

        self.with_slot(handle, |slot| {
            if let Err(err) = slot.file_mut(kind).append(bytes) {
                tracing::error!(
                    basename = %slot.basename,
                    stream = ?kind,
                    error = %err,
                    "record append failed"
                );
                return Err(StoreError::Io(err));
            }
            slot.bump(kind);
            Ok(())
        })
    }

    /// Number of records written to a session stream since open
    pub fn stream_count(&self, handle: SessionHandle, kind: StreamKind) -> Result<u64> {
        self.with_slot(handle, |slot| Ok(slot.count(kind)))
    }

    /// Number of currently open sessions
    pub fn open_count(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.is_some()).count()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run `f` against the slot behind `handle`, validating the generation
    fn with_slot<T>(
        &self,
        handle: SessionHandle,
        f: impl FnOnce(&mut SessionSlot) -> Result<T>,
    ) -> Result<T> {
        let mut slots = self.slots.lock();
        let entry = slots.get_mut(handle.slot).ok_or(StoreError::InvalidHandle)?;
        match entry {
            Some(slot) if slot.generation == handle.generation => f(slot),
            _ => Err(StoreError::InvalidHandle),
        }
    }

    fn stream_path(&self, basename: &str, kind: StreamKind) -> PathBuf {
        self.mount_dir.join(kind.file_name(basename))
    }
}

/// Reject basenames that would escape the mount point
fn validate_basename(basename: &str) -> Result<()> {
    let plain = !basename.is_empty()
        && basename != "."
        && basename != ".."
        && !basename
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0');
    if plain {
        Ok(())
    } else {
        Err(StoreError::InvalidBasename(basename.to_string()))
    }
}
