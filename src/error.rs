//! Error types for stridelog
//!
//! Provides a unified error type for all store operations.
//!
//! `Capacity`, `NotFound`, `OutOfRange`, `InvalidHandle` and
//! `InvalidBasename` are recoverable and handled locally by the caller.
//! `Io` is returned as-is on the read/count/delete paths; on the write path
//! it is escalated to the recovery controller instead (see
//! [`crate::recovery`]), after which every writer-side call fails with
//! `Recovering`.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for stridelog operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Admission Errors
    // -------------------------------------------------------------------------
    #[error("session pool full: all {capacity} slots in use")]
    Capacity { capacity: usize },

    #[error("invalid session handle (stale or already closed)")]
    InvalidHandle,

    #[error("invalid basename: {0:?}")]
    InvalidBasename(String),

    // -------------------------------------------------------------------------
    // Read-path Errors
    // -------------------------------------------------------------------------
    #[error("stream file not found")]
    NotFound,

    #[error("record index {index} out of range (count = {count})")]
    OutOfRange { index: u64, count: u64 },

    // -------------------------------------------------------------------------
    // Fault Errors
    // -------------------------------------------------------------------------
    /// The store has entered terminal recovery after a write fault.
    ///
    /// In production the configured platform restarts the device before this
    /// is ever observed; it surfaces only when the fault policy returns
    /// (log-only policies, tests).
    #[error("store is recovering from a write fault; no further writes accepted")]
    Recovering,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
