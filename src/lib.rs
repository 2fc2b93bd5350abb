//! # stridelog
//!
//! A flash-resident, append-only store of fixed-stride binary records,
//! paired per capture session into a raw-sample stream and a summary
//! stream, with:
//! - Index-addressed read-back (`offset = index * stride`, no on-disk index)
//! - A statically bounded pool of open write sessions
//! - An optional harvest-on-last-read consumption protocol
//! - A deliberate fail-fast wipe+restart policy on write faults
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐                      ┌──────────────────┐
//! │  Producer task   │                      │  Harvester task  │
//! │ (sampling/infer) │                      │  (upload/drain)  │
//! └────────┬─────────┘                      └────────▲─────────┘
//!          │ write_raw / write_summary               │ count / read / delete
//! ┌────────▼─────────┐                      ┌────────┴─────────┐
//! │   SessionPool    │                      │   StreamReader   │
//! │  (K slots, K=1)  │                      │   (stateless)    │
//! └────────┬─────────┘                      └────────▲─────────┘
//!          │ append(stride)                          │ seek(index × stride)
//! ┌────────▼──────────────────────────────────────────┴────────┐
//! │                   FileSystem (mounted)                     │
//! │        <mount>/<basename>.raw   <mount>/<basename>.act     │
//! └────────────────────────────┬───────────────────────────────┘
//!                              │ write fault
//!                    ┌─────────▼──────────┐
//!                    │ RecoveryController │
//!                    │  (wipe + restart)  │
//!                    └────────────────────┘
//! ```
//!
//! The producer and harvester never share an open file descriptor: one
//! writer session per basename, closed before the reader acts on it.
//!
//! ## Durability trade-off
//!
//! A write fault (including store exhaustion) erases the **entire**
//! storage partition and restarts the device. All un-harvested data is
//! gone afterwards — that is the expected behavior, not a bug; correctness
//! of future sessions is valued over preservation of the one that faulted.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod fs;
pub mod reader;
pub mod record;
pub mod recovery;
pub mod session;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use fs::{FileSystem, StdFs, StorageFile};
pub use reader::StreamReader;
pub use record::{
    RawRecord, SampleFrame, StreamKind, SummaryRecord, FRAMES_PER_RECORD, RAW_STRIDE,
    SUMMARY_STRIDE,
};
pub use recovery::{FaultPolicy, HostPlatform, LogOnly, Platform, WipeRestart};
pub use session::SessionHandle;
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of stridelog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
