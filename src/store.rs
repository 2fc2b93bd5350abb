//! Record Store
//!
//! The facade that ties the session pool, reader and recovery controller
//! together.
//!
//! ## Concurrency Model: Single Writer, Then Single Reader (per basename)
//!
//! - **Writes** (`open_session`/`write_*`/`close_session`): serialized by
//!   the pool's slot-table mutex. Writes within one session are strictly
//!   ordered and append-only.
//! - **Reads** (`count`/`read_*`/`delete`): stateless and lock-free; the
//!   design assumes the writer has closed the session before any reader
//!   acts on that basename. Concurrent read-while-write on the same
//!   basename is out of contract and may observe a torn record or an
//!   inconsistent count.
//!
//! All operations are synchronous and may block on storage I/O; an
//! external watchdog handles stuck devices.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::fs::{FileSystem, StdFs};
use crate::reader::StreamReader;
use crate::record::{RawRecord, StreamKind, SummaryRecord};
use crate::recovery::{FaultPolicy, HostPlatform, RecoveryController, WipeRestart};
use crate::session::{SessionHandle, SessionPool};

/// The record store: one producer-facing session pool plus the stateless
/// read-back surface
pub struct RecordStore {
    config: StoreConfig,
    pool: SessionPool,
    reader: StreamReader,
    recovery: RecoveryController,
}

impl RecordStore {
    /// Open a store over the host filesystem with the production
    /// wipe+restart fault policy
    pub fn open(config: StoreConfig) -> Result<Self> {
        let policy = WipeRestart::new(HostPlatform::new(config.mount_dir.clone()));
        Self::open_with(config, Arc::new(StdFs), Box::new(policy))
    }

    /// Open a store with default config rooted at `mount_dir`
    /// (convenience method)
    pub fn open_path(mount_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let config = StoreConfig::builder().mount_dir(mount_dir).build();
        Self::open(config)
    }

    /// Open a store over an explicit filesystem and fault policy
    ///
    /// This is the seam embedded integrators and tests use: any
    /// [`FileSystem`] backend, any [`FaultPolicy`].
    pub fn open_with(
        config: StoreConfig,
        fs: Arc<dyn FileSystem>,
        policy: Box<dyn FaultPolicy>,
    ) -> Result<Self> {
        fs.create_dir_all(&config.mount_dir)?;

        // Mirror of the on-device init listing: what survived the last boot
        let existing = fs.list(&config.mount_dir)?;
        tracing::info!(
            mount = %config.mount_dir.display(),
            files = existing.len(),
            "record store mounted"
        );
        for (name, size) in &existing {
            tracing::debug!(file = %name, size, "existing stream file");
        }

        let pool = SessionPool::new(
            Arc::clone(&fs),
            config.mount_dir.clone(),
            config.max_open_sessions,
        );
        let reader = StreamReader::new(
            Arc::clone(&fs),
            config.mount_dir.clone(),
            config.auto_harvest,
        );

        Ok(Self {
            config,
            pool,
            reader,
            recovery: RecoveryController::new(policy),
        })
    }

    // =========================================================================
    // Producer Surface (session-scoped)
    // =========================================================================

    /// Open a capture session for `basename`
    ///
    /// Creates (or truncates) both stream files and resets both record
    /// counters to zero. Fails with `Capacity` when the pool is full.
    pub fn open_session(&self, basename: &str) -> Result<SessionHandle> {
        if self.recovery.is_recovering() {
            return Err(StoreError::Recovering);
        }
        self.pool.open(basename)
    }

    /// Close a session, syncing and finalizing both stream files
    ///
    /// After close the basename enters its read-only phase; the handle is
    /// rejected from then on.
    pub fn close_session(&self, handle: SessionHandle) -> Result<()> {
        self.pool.close(handle)
    }

    /// Append one raw sample-batch record to the session's raw stream
    pub fn write_raw(&self, handle: SessionHandle, record: &RawRecord) -> Result<()> {
        self.write_stride(handle, StreamKind::Raw, &record.encode())
    }

    /// Append one summary record to the session's summary stream
    pub fn write_summary(&self, handle: SessionHandle, record: &SummaryRecord) -> Result<()> {
        self.write_stride(handle, StreamKind::Summary, &record.encode())
    }

    /// Records written to the session's raw stream since open
    pub fn raw_count(&self, handle: SessionHandle) -> Result<u64> {
        self.pool.stream_count(handle, StreamKind::Raw)
    }

    /// Records written to the session's summary stream since open
    pub fn summary_count(&self, handle: SessionHandle) -> Result<u64> {
        self.pool.stream_count(handle, StreamKind::Summary)
    }

    // =========================================================================
    // Consumer Surface (basename-addressed)
    // =========================================================================

    /// Number of records in a closed stream (`file_size / stride`)
    pub fn count(&self, basename: &str, kind: StreamKind) -> Result<u64> {
        self.reader.count(basename, kind)
    }

    /// Read the raw record at `index` (see [`StreamReader`] for the
    /// harvest-on-last-read contract)
    pub fn read_raw(&self, basename: &str, index: u64) -> Result<RawRecord> {
        self.reader.read_raw(basename, index)
    }

    /// Read the summary record at `index`
    pub fn read_summary(&self, basename: &str, index: u64) -> Result<SummaryRecord> {
        self.reader.read_summary(basename, index)
    }

    /// Unlink a stream file unconditionally
    pub fn delete(&self, basename: &str, kind: StreamKind) -> Result<()> {
        self.reader.delete(basename, kind)
    }

    /// A standalone reader for the consumer task
    ///
    /// Readers are cheap clones sharing the store's filesystem handle; the
    /// harvest task typically owns one instead of the whole store.
    pub fn reader(&self) -> StreamReader {
        self.reader.clone()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of currently open sessions
    pub fn open_session_count(&self) -> usize {
        self.pool.open_count()
    }

    /// Whether the store has entered terminal recovery
    pub fn is_recovering(&self) -> bool {
        self.recovery.is_recovering()
    }

    /// The store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Shared write path: refuse while recovering, escalate I/O faults
    ///
    /// An I/O fault here is not surfaced as a retryable error — it engages
    /// the recovery controller (production: partition wipe + device
    /// restart). Handle validation errors pass through untouched.
    fn write_stride(&self, handle: SessionHandle, kind: StreamKind, bytes: &[u8]) -> Result<()> {
        if self.recovery.is_recovering() {
            return Err(StoreError::Recovering);
        }

        match self.pool.append(handle, kind, bytes) {
            Err(StoreError::Io(err)) => {
                self.recovery.engage(&err);
                // Only reachable when the fault policy returns
                Err(StoreError::Recovering)
            }
            other => other,
        }
    }
}
