//! Assertion functions for hit sequences and numerical comparisons

use cosmic_muon_global_rs::{HitRef, SubDetector};

/// Compare scalar values with tolerance
pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, field_name: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {}, got {} (diff: {}, tolerance: {})",
        field_name,
        expected,
        actual,
        diff,
        tolerance
    );
}

/// Compare the vertical positions of a hit sequence element-wise
pub fn assert_heights(hits: &[HitRef], expected: &[f64], tolerance: f64, field_name: &str) {
    assert_eq!(
        hits.len(),
        expected.len(),
        "{}: length mismatch (actual: {}, expected: {})",
        field_name,
        hits.len(),
        expected.len()
    );

    for (i, (hit, &e)) in hits.iter().zip(expected.iter()).enumerate() {
        assert_scalar_close(
            hit.global_position().y,
            e,
            tolerance,
            &format!("{}[{}]", field_name, i),
        );
    }
}

/// Check that the hits of one subsystem never climb, in sequence order
pub fn assert_descending_run(hits: &[HitRef], det: SubDetector, field_name: &str) {
    let heights: Vec<f64> = hits
        .iter()
        .filter(|h| h.subdetector() == det && h.is_valid())
        .map(|h| h.global_position().y)
        .collect();
    for (i, pair) in heights.windows(2).enumerate() {
        assert!(
            pair[0] >= pair[1],
            "{}: {} run climbs at {} ({} -> {})",
            field_name,
            det.label(),
            i,
            pair[0],
            pair[1]
        );
    }
}

/// Check that `actual` and `expected` hold the same hits in the same order
pub fn assert_same_hits(actual: &[HitRef], expected: &[HitRef], field_name: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: length mismatch", field_name);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            std::rc::Rc::ptr_eq(a, e),
            "{}[{}]: different hit (actual y {}, expected y {})",
            field_name,
            i,
            a.global_position().y,
            e.global_position().y
        );
    }
}
