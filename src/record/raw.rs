//! Raw sample-batch record
//!
//! Bundles a batch of consecutive sensor frames under one record-level
//! sequence number and timestamp, trading per-sample overhead for batched
//! I/O.
//!
//! ## On-disk layout (little-endian, 252 bytes)
//! ```text
//! offset  size  field
//!      0     4  record_num   (u32)
//!      4     8  timestamp_ms (u64)
//!     12   240  frames       (10 × 24-byte SampleFrame)
//! ```
//! Each frame:
//! ```text
//! offset  size  field
//!      0     4  ax (f32)    12     4  gx (f32)
//!      4     4  ay (f32)    16     4  gy (f32)
//!      8     4  az (f32)    20     4  gz (f32)
//! ```

/// Sample frames batched per raw record (fixed per deployment)
pub const FRAMES_PER_RECORD: usize = 10;

/// Byte size of one encoded sample frame (six f32)
pub const FRAME_SIZE: usize = 6 * 4;

/// Byte size of the record header (record_num + timestamp_ms)
const HEADER_SIZE: usize = 4 + 8;

/// Fixed byte size of one encoded raw record
pub const RAW_STRIDE: usize = HEADER_SIZE + FRAMES_PER_RECORD * FRAME_SIZE;

/// One accelerometer + gyroscope sextuple
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleFrame {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}

impl SampleFrame {
    /// Encode into exactly `FRAME_SIZE` bytes
    fn encode_into(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.ax.to_le_bytes());
        buf[4..8].copy_from_slice(&self.ay.to_le_bytes());
        buf[8..12].copy_from_slice(&self.az.to_le_bytes());
        buf[12..16].copy_from_slice(&self.gx.to_le_bytes());
        buf[16..20].copy_from_slice(&self.gy.to_le_bytes());
        buf[20..24].copy_from_slice(&self.gz.to_le_bytes());
    }

    /// Decode from exactly `FRAME_SIZE` bytes
    fn decode(buf: &[u8]) -> Self {
        Self {
            ax: f32::from_le_bytes(buf[0..4].try_into().unwrap()),
            ay: f32::from_le_bytes(buf[4..8].try_into().unwrap()),
            az: f32::from_le_bytes(buf[8..12].try_into().unwrap()),
            gx: f32::from_le_bytes(buf[12..16].try_into().unwrap()),
            gy: f32::from_le_bytes(buf[16..20].try_into().unwrap()),
            gz: f32::from_le_bytes(buf[20..24].try_into().unwrap()),
        }
    }
}

/// A batch of `FRAMES_PER_RECORD` sample frames plus header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    /// Producer-stamped sequence number (monotonic per session)
    pub record_num: u32,

    /// Capture timestamp of the batch (milliseconds since boot/epoch,
    /// producer's clock)
    pub timestamp_ms: u64,

    /// The batched sensor frames, oldest first
    pub frames: [SampleFrame; FRAMES_PER_RECORD],
}

impl RawRecord {
    /// Encode into the fixed on-disk layout
    pub fn encode(&self) -> [u8; RAW_STRIDE] {
        let mut buf = [0u8; RAW_STRIDE];
        buf[0..4].copy_from_slice(&self.record_num.to_le_bytes());
        buf[4..12].copy_from_slice(&self.timestamp_ms.to_le_bytes());

        let mut off = HEADER_SIZE;
        for frame in &self.frames {
            frame.encode_into(&mut buf[off..off + FRAME_SIZE]);
            off += FRAME_SIZE;
        }
        buf
    }

    /// Decode from exactly one stride of bytes
    pub fn decode(buf: &[u8; RAW_STRIDE]) -> Self {
        let record_num = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        let timestamp_ms = u64::from_le_bytes(buf[4..12].try_into().unwrap());

        let mut frames = [SampleFrame::default(); FRAMES_PER_RECORD];
        let mut off = HEADER_SIZE;
        for frame in frames.iter_mut() {
            *frame = SampleFrame::decode(&buf[off..off + FRAME_SIZE]);
            off += FRAME_SIZE;
        }

        Self {
            record_num,
            timestamp_ms,
            frames,
        }
    }
}
