// Segment: buffered writes, flush, filter rebuild, text persistence.

use std::fs;

use avl_lsm::OrderedMap;
use avl_lsm::segment::Segment;
use avl_lsm::segment::file::{read_table, remove_leftovers, segment_path, write_table};
use tempfile::tempdir;

fn segment(dir: &std::path::Path, id: u64) -> Segment {
    Segment::new(dir, id, 100, 0.01)
}

// =============================================================================
// Test 1: A fresh segment is empty and writes nothing
// =============================================================================
#[test]
fn new_segment_is_empty() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);

    assert_eq!(seg.height(), 0);
    assert!(!seg.is_dirty());
    assert_eq!(seg.find(1), None);
    assert!(seg.snapshot().is_empty());

    assert!(seg.flush().is_empty());
    assert!(!seg.path().exists());
}

// =============================================================================
// Test 2: Inserts become visible after flush
// =============================================================================
#[test]
fn insert_flush_find() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 3);

    seg.insert(10, "ten".to_string());
    seg.insert(5, "five".to_string());
    assert!(seg.may_contain(10));
    assert!(seg.is_dirty());
    assert_eq!(seg.pending(), 2);

    seg.flush();

    assert!(!seg.is_dirty());
    assert_eq!(seg.pending(), 0);
    assert_eq!(seg.path(), segment_path(dir.path(), 3));
    assert_eq!(seg.find(10), Some("ten".to_string()));
    assert_eq!(seg.find(5), Some("five".to_string()));
    assert_eq!(seg.find(7), None);
    assert_eq!(fs::read_to_string(seg.path()).unwrap(), "5 five\n10 ten\n");
}

// =============================================================================
// Test 3: Updates land only for keys the table holds
// =============================================================================
#[test]
fn update_reports_landed_keys() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);
    seg.insert(1, "a".to_string());
    seg.insert(2, "b".to_string());
    seg.flush();

    seg.update(2, "B".to_string());
    seg.update(3, "C".to_string());
    let landed = seg.flush();

    assert_eq!(landed, vec![2]);
    assert_eq!(seg.find(2), Some("B".to_string()));
    assert_eq!(seg.find(3), None);
    assert_eq!(seg.snapshot(), vec![(1, "a".to_string()), (2, "B".to_string())]);
}

// =============================================================================
// Test 4: Remove deletes physically and evicts the key from the filter
// =============================================================================
#[test]
fn remove_deletes_and_rebuilds_filter() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);
    for key in 0..10 {
        seg.insert(key, key.to_string());
    }
    seg.flush();

    seg.remove(4);
    seg.remove(40);
    seg.flush();

    assert_eq!(seg.find(4), None);
    assert!(!seg.may_contain(4));
    assert_eq!(seg.snapshot().len(), 9);
    assert!(!fs::read_to_string(seg.path()).unwrap().contains("4 4\n"));
}

// =============================================================================
// Test 5: A key removed once is not removed again by later flushes
// =============================================================================
#[test]
fn reinsert_after_remove_survives_next_flush() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);
    seg.insert(1, "old".to_string());
    seg.flush();
    seg.remove(1);
    seg.flush();

    seg.insert(1, "new".to_string());
    seg.flush();

    assert_eq!(seg.find(1), Some("new".to_string()));
}

// =============================================================================
// Test 6: Filter soundness after flush
// =============================================================================
#[test]
fn every_persisted_key_passes_filter() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);
    for key in (0..300).map(|k| k * 13 - 1000) {
        seg.insert(key, format!("v{key}"));
    }
    for key in (0..300).step_by(4).map(|k| k * 13 - 1000) {
        seg.remove(key);
    }
    seg.flush();

    let persisted = read_table(seg.path()).unwrap();
    assert_eq!(persisted.len(), 225);
    for node in &persisted {
        assert!(seg.may_contain(*node.key()));
    }
}

// =============================================================================
// Test 7: Height estimate grows with pending inserts
// =============================================================================
#[test]
fn height_estimate_without_loading() {
    let dir = tempdir().unwrap();
    let mut seg = segment(dir.path(), 0);

    seg.insert(1, "a".to_string());
    assert_eq!(seg.height(), 0);
    seg.insert(2, "b".to_string());
    assert_eq!(seg.height(), 1);
    seg.insert(3, "c".to_string());
    seg.insert(4, "d".to_string());
    assert_eq!(seg.height(), 2);

    seg.flush();
    assert_eq!(seg.height(), 3);
}

// =============================================================================
// Test 8: Persistence round trip
// =============================================================================
#[test]
fn write_then_read_table_round_trip() {
    let dir = tempdir().unwrap();
    let path = segment_path(dir.path(), 0);

    let mut table = OrderedMap::new();
    for key in [8, -2, 5, 13, 0] {
        table.insert(key, format!("value with spaces {key}"));
    }
    table.make_tombstone(5);
    write_table(&path, &table).unwrap();

    let loaded = read_table(&path).unwrap();
    let pairs: Vec<(i64, String)> = loaded
        .iter()
        .map(|n| (*n.key(), n.value().unwrap().clone()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            (-2, "value with spaces -2".to_string()),
            (0, "value with spaces 0".to_string()),
            (8, "value with spaces 8".to_string()),
            (13, "value with spaces 13".to_string()),
        ]
    );
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().unwrap();

    let table = read_table(&segment_path(dir.path(), 9)).unwrap();

    assert!(table.is_empty());
}

// =============================================================================
// Test 9: Corrupt files are reported by the reader, tolerated by the segment
// =============================================================================
#[test]
fn corrupt_file_is_treated_as_empty() {
    let dir = tempdir().unwrap();
    let seg = segment(dir.path(), 0);
    fs::write(seg.path(), "1 one\nnot-a-record\n").unwrap();

    assert!(matches!(
        read_table(seg.path()),
        Err(avl_lsm::Error::Corruption(_))
    ));
    assert_eq!(seg.find(1), None);
    assert!(seg.snapshot().is_empty());
}

#[test]
fn unwritable_path_loses_flush_without_panicking() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let mut seg = segment(&missing, 0);

    seg.insert(1, "one".to_string());
    seg.flush();

    assert!(!seg.is_dirty());
    assert_eq!(seg.find(1), None);
    // The filter was rebuilt from the table that failed to persist
    assert!(seg.may_contain(1));
}

// =============================================================================
// Test 10: Startup cleanup removes consecutive segment files
// =============================================================================
#[test]
fn remove_leftovers_stops_at_first_gap() {
    let dir = tempdir().unwrap();
    for id in [0, 1, 2, 4] {
        fs::write(segment_path(dir.path(), id), "1 x\n").unwrap();
    }

    let removed = remove_leftovers(dir.path(), 0).unwrap();

    assert_eq!(removed, 3);
    assert!(!segment_path(dir.path(), 0).exists());
    assert!(segment_path(dir.path(), 4).exists());
    assert_eq!(remove_leftovers(dir.path(), 0).unwrap(), 0);
}
