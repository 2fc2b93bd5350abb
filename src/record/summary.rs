//! Summary (activity outcome) record
//!
//! Carries one classified outcome per record: which model produced it,
//! what activity it saw, and the derived metric.
//!
//! ## On-disk layout (little-endian, 20 bytes)
//! ```text
//! offset  size  field
//!      0     4  record_num    (u32)
//!      4     8  timestamp_ms  (u64)
//!     12     1  start_marker  (u8)
//!     13     1  model_kind    (u8)
//!     14     1  activity_kind (u8)
//!     15     4  metric        (f32)
//!     19     1  health        (u8)
//! ```

/// Fixed byte size of one encoded summary record
pub const SUMMARY_STRIDE: usize = 20;

/// One inference/activity outcome
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryRecord {
    /// Producer-stamped sequence number (monotonic per session)
    pub record_num: u32,

    /// When the outcome was produced (milliseconds, producer's clock)
    pub timestamp_ms: u64,

    /// Marks the start of an activity bout
    pub start_marker: u8,

    /// Which model classified this outcome
    pub model_kind: u8,

    /// Classified activity kind
    pub activity_kind: u8,

    /// Repetition count / confidence metric
    pub metric: f32,

    /// Derived health/flag byte
    pub health: u8,
}

impl SummaryRecord {
    /// Encode into the fixed on-disk layout
    pub fn encode(&self) -> [u8; SUMMARY_STRIDE] {
        let mut buf = [0u8; SUMMARY_STRIDE];
        buf[0..4].copy_from_slice(&self.record_num.to_le_bytes());
        buf[4..12].copy_from_slice(&self.timestamp_ms.to_le_bytes());
        buf[12] = self.start_marker;
        buf[13] = self.model_kind;
        buf[14] = self.activity_kind;
        buf[15..19].copy_from_slice(&self.metric.to_le_bytes());
        buf[19] = self.health;
        buf
    }

    /// Decode from exactly one stride of bytes
    pub fn decode(buf: &[u8; SUMMARY_STRIDE]) -> Self {
        Self {
            record_num: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            timestamp_ms: u64::from_le_bytes(buf[4..12].try_into().unwrap()),
            start_marker: buf[12],
            model_kind: buf[13],
            activity_kind: buf[14],
            metric: f32::from_le_bytes(buf[15..19].try_into().unwrap()),
            health: buf[19],
        }
    }
}
