use avl_lsm::bloom::{BloomFilter, FilterBuilder};

#[test]
fn test_empty_filter_returns_false() {
    let bf = BloomFilter::new(100, 0.01);

    // Empty filter should never return true
    assert!(!bf.may_contain(0));
    assert!(!bf.may_contain(1));
    assert!(!bf.may_contain(-1));
}

#[test]
fn test_inserted_key_found() {
    let mut bf = BloomFilter::new(100, 0.01);

    bf.insert(42);

    assert!(bf.may_contain(42));
}

#[test]
fn test_duplicate_insert_no_error() {
    let mut bf = BloomFilter::new(100, 0.01);

    bf.insert(7);
    bf.insert(7);
    bf.insert(7);

    assert!(bf.may_contain(7));
}

#[test]
fn test_extreme_keys() {
    let mut bf = BloomFilter::new(100, 0.01);

    bf.insert(i64::MIN);
    bf.insert(i64::MAX);
    bf.insert(0);

    assert!(bf.may_contain(i64::MIN));
    assert!(bf.may_contain(i64::MAX));
    assert!(bf.may_contain(0));
}

#[test]
fn test_no_false_negatives() {
    let mut bf = BloomFilter::new(1000, 0.01);

    for key in (0..1000).map(|i| i * 7919 - 3_000_000) {
        bf.insert(key);
    }

    for key in (0..1000).map(|i| i * 7919 - 3_000_000) {
        assert!(bf.may_contain(key), "false negative for {key}");
    }
}

#[test]
fn test_false_positive_rate() {
    let n = 10000;
    let target_fpr = 0.01; // 1% target
    let mut bf = BloomFilter::new(n, target_fpr);

    for key in 0..n as i64 {
        bf.insert(key);
    }

    // Check n different keys (not inserted)
    let false_positives = (n as i64..2 * n as i64)
        .filter(|&key| bf.may_contain(key))
        .count();
    let actual_fpr = false_positives as f64 / n as f64;

    println!("Target FPR: {}, Actual FPR: {}", target_fpr, actual_fpr);

    // Should be within 2x of target (so under 2%)
    assert!(
        actual_fpr < target_fpr * 2.0,
        "FPR too high: {} vs target {}",
        actual_fpr,
        target_fpr
    );
}

#[test]
fn test_overfilled_filter_still_sound() {
    // Segments can be asked to hold more keys than their filter was sized for.
    let mut bf = BloomFilter::new(3, 0.01);

    for key in 0..200 {
        bf.insert(key);
    }

    assert!((0..200).all(|key| bf.may_contain(key)));
}

#[test]
fn test_builder_matches_direct_inserts() {
    let mut builder = FilterBuilder::new(100, 0.01);
    builder.extend([3, 1, 4, 1, 5]);
    builder.add_key(9);
    assert_eq!(builder.added(), 6);

    let bf = builder.build();

    for key in [1, 3, 4, 5, 9] {
        assert!(bf.may_contain(key));
    }
    assert_eq!(bf.capacity(), 100);
    assert_eq!(bf.false_positive_rate(), 0.01);
}
