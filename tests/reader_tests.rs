//! Tests for basename-addressed read-back and the consumption protocol
//!
//! These tests verify:
//! - Round trip: records read back byte-identical, in write order
//! - `count` = file_size / stride, idempotent, `NotFound` when absent
//! - `OutOfRange` on index >= count
//! - Harvest-on-last-read deletes the stream; peek semantics with the
//!   flag off
//! - Explicit `delete`, recreate-after-harvest

use std::sync::Arc;

use stridelog::{
    LogOnly, RawRecord, RecordStore, SampleFrame, StdFs, StoreConfig, StoreError, StreamKind,
    SummaryRecord, FRAMES_PER_RECORD,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store(auto_harvest: bool) -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::builder()
        .mount_dir(temp_dir.path())
        .auto_harvest(auto_harvest)
        .build();
    let store = RecordStore::open_with(config, Arc::new(StdFs), Box::new(LogOnly)).unwrap();
    (temp_dir, store)
}

fn raw_record(record_num: u32) -> RawRecord {
    let mut frames = [SampleFrame::default(); FRAMES_PER_RECORD];
    for (i, frame) in frames.iter_mut().enumerate() {
        frame.ax = record_num as f32 + i as f32 * 0.125;
        frame.gz = -(record_num as f32) - i as f32 * 0.125;
    }
    RawRecord {
        record_num,
        timestamp_ms: 50_000 + record_num as u64 * 10,
        frames,
    }
}

fn summary_record(record_num: u32) -> SummaryRecord {
    SummaryRecord {
        record_num,
        timestamp_ms: 50_000 + record_num as u64 * 10,
        start_marker: (record_num == 0) as u8,
        model_kind: 1,
        activity_kind: (record_num % 4) as u8,
        metric: record_num as f32 * 1.5,
        health: 100,
    }
}

/// Write `raw` + `summary` records to a fresh session and close it
fn populate(store: &RecordStore, basename: &str, raw: u32, summary: u32) {
    let handle = store.open_session(basename).unwrap();
    for i in 0..raw {
        store.write_raw(handle, &raw_record(i)).unwrap();
    }
    for i in 0..summary {
        store.write_summary(handle, &summary_record(i)).unwrap();
    }
    store.close_session(handle).unwrap();
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_in_write_order() {
    let (_temp, store) = setup_store(false);
    populate(&store, "run1", 5, 3);

    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 5);
    assert_eq!(store.count("run1", StreamKind::Summary).unwrap(), 3);

    for i in 0..5 {
        assert_eq!(store.read_raw("run1", i).unwrap(), raw_record(i as u32));
    }
    for i in 0..3 {
        assert_eq!(
            store.read_summary("run1", i).unwrap(),
            summary_record(i as u32)
        );
    }
}

#[test]
fn test_streams_are_independent() {
    let (_temp, store) = setup_store(false);
    populate(&store, "run1", 4, 0);

    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 4);
    assert_eq!(store.count("run1", StreamKind::Summary).unwrap(), 0);
}

#[test]
fn test_standalone_reader_sees_closed_session() {
    let (_temp, store) = setup_store(false);
    populate(&store, "run1", 2, 1);

    // The harvest task holds its own reader, not the store
    let reader = store.reader();
    assert_eq!(reader.count("run1", StreamKind::Raw).unwrap(), 2);
    assert_eq!(reader.read_raw("run1", 1).unwrap(), raw_record(1));
    assert_eq!(reader.read_summary("run1", 0).unwrap(), summary_record(0));
}

#[test]
fn test_random_access_reads() {
    let (_temp, store) = setup_store(false);
    populate(&store, "run1", 10, 0);

    // Out-of-order access works when harvest is off
    for i in [7u64, 0, 9, 3, 3] {
        assert_eq!(store.read_raw("run1", i).unwrap(), raw_record(i as u32));
    }
}

// =============================================================================
// Count Tests
// =============================================================================

#[test]
fn test_count_not_found_for_absent_basename() {
    let (_temp, store) = setup_store(true);

    assert!(matches!(
        store.count("never_created", StreamKind::Raw),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn test_count_is_idempotent() {
    let (_temp, store) = setup_store(true);
    populate(&store, "run1", 3, 2);

    // No intervening read/write: identical results
    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 3);
    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 3);
    assert_eq!(store.count("run1", StreamKind::Summary).unwrap(), 2);
    assert_eq!(store.count("run1", StreamKind::Summary).unwrap(), 2);
}

#[test]
fn test_count_zero_for_empty_closed_session() {
    let (_temp, store) = setup_store(true);
    populate(&store, "empty", 0, 0);

    assert_eq!(store.count("empty", StreamKind::Raw).unwrap(), 0);
    assert_eq!(store.count("empty", StreamKind::Summary).unwrap(), 0);
}

#[test]
fn test_count_floors_torn_trailing_write() {
    let (temp, store) = setup_store(false);
    populate(&store, "run1", 2, 0);

    // Simulate a torn write: append half a record by hand
    let path = temp.path().join("run1.raw");
    let mut bytes = std::fs::read(&path).unwrap();
    bytes.extend_from_slice(&[0xAA; stridelog::RAW_STRIDE / 2]);
    std::fs::write(&path, bytes).unwrap();

    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 2);
    assert_eq!(store.read_raw("run1", 1).unwrap(), raw_record(1));
}

// =============================================================================
// Out-of-range Tests
// =============================================================================

#[test]
fn test_read_at_count_is_out_of_range() {
    let (_temp, store) = setup_store(true);
    populate(&store, "run1", 3, 1);

    assert!(matches!(
        store.read_raw("run1", 3),
        Err(StoreError::OutOfRange { index: 3, count: 3 })
    ));
    assert!(matches!(
        store.read_summary("run1", 1),
        Err(StoreError::OutOfRange { index: 1, count: 1 })
    ));

    // A failed read must not harvest anything
    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 3);
}

#[test]
fn test_read_from_empty_stream_is_out_of_range() {
    let (_temp, store) = setup_store(true);
    populate(&store, "empty", 0, 0);

    assert!(matches!(
        store.read_raw("empty", 0),
        Err(StoreError::OutOfRange { index: 0, count: 0 })
    ));
}

#[test]
fn test_read_absent_basename_is_not_found() {
    let (_temp, store) = setup_store(true);

    assert!(matches!(
        store.read_raw("ghost", 0),
        Err(StoreError::NotFound)
    ));
}

// =============================================================================
// Harvest Tests
// =============================================================================

#[test]
fn test_harvest_on_last_read_deletes_stream() {
    let (temp, store) = setup_store(true);
    populate(&store, "run1", 3, 0);

    let path = temp.path().join("run1.raw");

    store.read_raw("run1", 0).unwrap();
    assert!(path.exists());
    store.read_raw("run1", 1).unwrap();
    assert!(path.exists());

    // Terminal read drains and deletes
    assert_eq!(store.read_raw("run1", 2).unwrap(), raw_record(2));
    assert!(!path.exists());

    assert!(matches!(
        store.count("run1", StreamKind::Raw),
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.read_raw("run1", 0),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn test_harvest_applies_per_stream() {
    let (temp, store) = setup_store(true);
    populate(&store, "run1", 1, 2);

    // Draining the raw stream leaves the summary stream alone
    store.read_raw("run1", 0).unwrap();
    assert!(!temp.path().join("run1.raw").exists());
    assert!(temp.path().join("run1.act").exists());

    store.read_summary("run1", 0).unwrap();
    store.read_summary("run1", 1).unwrap();
    assert!(!temp.path().join("run1.act").exists());
}

#[test]
fn test_no_harvest_when_flag_disabled() {
    let (temp, store) = setup_store(false);
    populate(&store, "run1", 2, 0);

    // Terminal index can be re-read freely
    assert_eq!(store.read_raw("run1", 1).unwrap(), raw_record(1));
    assert_eq!(store.read_raw("run1", 1).unwrap(), raw_record(1));
    assert!(temp.path().join("run1.raw").exists());
    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 2);
}

#[test]
fn test_recreate_after_harvest_starts_fresh() {
    let (_temp, store) = setup_store(true);
    populate(&store, "run1", 2, 0);

    // Drain and harvest
    store.read_raw("run1", 0).unwrap();
    store.read_raw("run1", 1).unwrap();
    assert!(matches!(
        store.count("run1", StreamKind::Raw),
        Err(StoreError::NotFound)
    ));

    // Same basename opens as a brand-new empty stream, not an error
    let handle = store.open_session("run1").unwrap();
    assert_eq!(store.raw_count(handle).unwrap(), 0);
    store.write_raw(handle, &raw_record(100)).unwrap();
    store.close_session(handle).unwrap();

    assert_eq!(store.count("run1", StreamKind::Raw).unwrap(), 1);
    assert_eq!(store.read_raw("run1", 0).unwrap(), raw_record(100));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_explicit_delete_removes_stream() {
    let (temp, store) = setup_store(false);
    populate(&store, "run1", 3, 3);

    store.delete("run1", StreamKind::Raw).unwrap();
    assert!(!temp.path().join("run1.raw").exists());

    // Independent of read state; the other stream survives
    assert_eq!(store.count("run1", StreamKind::Summary).unwrap(), 3);

    store.delete("run1", StreamKind::Summary).unwrap();
    assert!(matches!(
        store.count("run1", StreamKind::Summary),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn test_delete_absent_stream_is_not_found() {
    let (_temp, store) = setup_store(true);

    assert!(matches!(
        store.delete("ghost", StreamKind::Raw),
        Err(StoreError::NotFound)
    ));
}
