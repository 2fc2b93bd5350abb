//! Record Module
//!
//! Defines the fixed on-disk byte layout of each record kind.
//!
//! ## Responsibilities
//! - Explicit byte-layout descriptors (offsets + little-endian fields) so
//!   the persisted format never depends on in-memory struct layout
//! - Fixed strides enabling `offset = index * stride` addressing with no
//!   directory or index structure
//!
//! ## Stream Files
//! ```text
//! <mount>/<basename>.raw          <mount>/<basename>.act
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │ RawRecord (252 B)    │        │ SummaryRecord (20 B) │
//! ├──────────────────────┤        ├──────────────────────┤
//! │ RawRecord (252 B)    │        │ SummaryRecord (20 B) │
//! ├──────────────────────┤        ├──────────────────────┤
//! │ ...                  │        │ ...                  │
//! └──────────────────────┘        └──────────────────────┘
//! ```
//!
//! A stream file's size is always an exact multiple of its record stride;
//! that is the load-bearing invariant for index-addressed reads.

mod raw;
mod summary;

pub use raw::{RawRecord, SampleFrame, FRAMES_PER_RECORD, FRAME_SIZE, RAW_STRIDE};
pub use summary::{SummaryRecord, SUMMARY_STRIDE};

/// The two streams owned by every capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Batched raw sensor frames (`<basename>.raw`)
    Raw,
    /// One classified outcome per record (`<basename>.act`)
    Summary,
}

impl StreamKind {
    /// File extension distinguishing the stream on disk
    pub fn extension(self) -> &'static str {
        match self {
            StreamKind::Raw => "raw",
            StreamKind::Summary => "act",
        }
    }

    /// Fixed byte size of one record of this kind
    pub fn stride(self) -> usize {
        match self {
            StreamKind::Raw => RAW_STRIDE,
            StreamKind::Summary => SUMMARY_STRIDE,
        }
    }

    /// File name of this stream for a given basename
    pub fn file_name(self, basename: &str) -> String {
        format!("{}.{}", basename, self.extension())
    }
}
