//! Record Reader
//!
//! Stateless, basename-addressed read-back. The reader is an independent
//! actor (the harvest/upload task); it never shares an open file descriptor
//! with the writer and assumes the writer has closed the session before it
//! touches a basename.
//!
//! Byte offsets are computed from the record index and the stream's fixed
//! stride (`offset = index * stride`); no directory or index structure
//! exists on disk.
//!
//! ## Consumption protocol
//! With `auto_harvest` enabled (the default), reading the terminal record
//! of a stream deletes the backing file: a consumer that reads indices
//! 0..count in order drains and removes the stream in one pass. The caller
//! must honor that contract — reading out of order, skipping the last
//! index, or re-reading after deletion yields `NotFound`. With the flag
//! disabled reads are pure and the consumer calls [`StreamReader::delete`]
//! when done.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::fs::FileSystem;
use crate::record::{RawRecord, StreamKind, SummaryRecord, RAW_STRIDE, SUMMARY_STRIDE};

/// Basename-addressed reader over closed stream files
#[derive(Clone)]
pub struct StreamReader {
    fs: Arc<dyn FileSystem>,
    mount_dir: PathBuf,
    auto_harvest: bool,
}

impl StreamReader {
    pub(crate) fn new(fs: Arc<dyn FileSystem>, mount_dir: PathBuf, auto_harvest: bool) -> Self {
        Self {
            fs,
            mount_dir,
            auto_harvest,
        }
    }

    /// Number of records in a stream, derived from `file_size / stride`
    ///
    /// Returns `NotFound` when the stream file does not exist (never
    /// created, or already harvested).
    pub fn count(&self, basename: &str, kind: StreamKind) -> Result<u64> {
        let path = self.stream_path(basename, kind);
        let size = self.fs.size(&path).map_err(map_io)?;

        let stride = kind.stride() as u64;
        if size % stride != 0 {
            // Torn trailing write; the partial record is unreadable anyway
            tracing::warn!(
                basename,
                stream = ?kind,
                size,
                stride,
                "stream size is not a stride multiple, ignoring trailing bytes"
            );
        }
        Ok(size / stride)
    }

    /// Read the raw record at `index`
    pub fn read_raw(&self, basename: &str, index: u64) -> Result<RawRecord> {
        let mut buf = [0u8; RAW_STRIDE];
        self.read_stride(basename, StreamKind::Raw, index, &mut buf)?;
        Ok(RawRecord::decode(&buf))
    }

    /// Read the summary record at `index`
    pub fn read_summary(&self, basename: &str, index: u64) -> Result<SummaryRecord> {
        let mut buf = [0u8; SUMMARY_STRIDE];
        self.read_stride(basename, StreamKind::Summary, index, &mut buf)?;
        Ok(SummaryRecord::decode(&buf))
    }

    /// Unlink a stream file unconditionally, independent of read state
    pub fn delete(&self, basename: &str, kind: StreamKind) -> Result<()> {
        let path = self.stream_path(basename, kind);
        self.fs.remove(&path).map_err(map_io)?;
        tracing::debug!(basename, stream = ?kind, "stream deleted");
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read exactly one stride at `index`, harvesting the file if this was
    /// the terminal record and auto-harvest is on
    fn read_stride(
        &self,
        basename: &str,
        kind: StreamKind,
        index: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        let count = self.count(basename, kind)?;
        if index >= count {
            return Err(StoreError::OutOfRange { index, count });
        }

        let path = self.stream_path(basename, kind);
        {
            let mut file = self.fs.open(&path).map_err(map_io)?;
            let offset = index * kind.stride() as u64;
            file.read_exact_at(offset, buf)?;
        }

        if self.auto_harvest && index == count - 1 {
            tracing::info!(
                basename,
                stream = ?kind,
                index,
                "read terminal record, harvesting stream"
            );
            self.fs.remove(&path).map_err(map_io)?;
        }

        Ok(())
    }

    fn stream_path(&self, basename: &str, kind: StreamKind) -> PathBuf {
        self.mount_dir.join(kind.file_name(basename))
    }
}

/// Missing files are a first-class outcome on the read path
fn map_io(err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound
    } else {
        StoreError::Io(err)
    }
}
