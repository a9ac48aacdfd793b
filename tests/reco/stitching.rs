//! Hit stitching scenarios and randomized properties

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cosmic_muon_global_rs::reco::stitcher::{orient_top_down, plan_stitch};
use cosmic_muon_global_rs::{stitch_hits, try_stitch_hits, RejectReason, StitchPlan, SubDetector};

use crate::helpers::assertions::{assert_descending_run, assert_heights, assert_same_hits};
use crate::helpers::fixtures::{heights, invalid_mu, mu, random_hits, tk};

const TOLERANCE: f64 = 1e-12;

#[test]
fn test_tracker_below_muon_is_appended() {
    let muon = vec![mu(0.5, 10.0), mu(0.5, 8.0), mu(0.5, 6.0)];
    let tracker = vec![tk(0.5, 5.0), tk(0.5, 3.0)];

    let merged = stitch_hits(muon, tracker);
    assert_heights(&merged, &[10.0, 8.0, 6.0, 5.0, 3.0], TOLERANCE, "merged");
}

#[test]
fn test_bottom_up_inputs_are_oriented_before_append() {
    let muon = vec![mu(0.5, 6.0), mu(0.5, 8.0), mu(0.5, 10.0)];
    let tracker = vec![tk(0.5, 3.0), tk(0.5, 5.0)];

    let merged = stitch_hits(muon, tracker);
    assert_heights(&merged, &[10.0, 8.0, 6.0, 5.0, 3.0], TOLERANCE, "merged");
}

#[test]
fn test_tracker_above_muon_is_prepended() {
    let muon = vec![mu(0.5, -6.0), mu(0.5, -9.0)];
    let tracker = vec![tk(0.5, -2.0), tk(0.5, -4.0)];

    let merged = stitch_hits(muon, tracker);
    assert_heights(&merged, &[-2.0, -4.0, -6.0, -9.0], TOLERANCE, "merged");
    assert_eq!(merged[0].subdetector(), SubDetector::Tracker);
}

#[test]
fn test_tracker_spliced_at_closest_approach() {
    // Stored bottom-up; closest approach between the 2nd and 3rd hit once
    // oriented top-down
    let muon = vec![mu(-3.0, 2.0), mu(3.0, 4.0), mu(0.0, 6.0)];
    let tracker = vec![tk(0.0, 2.5), tk(0.0, 3.5)];

    let mut oriented = muon.clone();
    orient_top_down(&mut oriented);
    let mut oriented_tracker = tracker.clone();
    let tracker_reversed = orient_top_down(&mut oriented_tracker).unwrap();
    // Stored first tracker hit (2.5) is farther from the joint at (3, 4)
    assert_eq!(
        plan_stitch(&oriented, &oriented_tracker, tracker_reversed),
        Some(StitchPlan::InsertAfter {
            joint: 1,
            reverse_tracker: true
        })
    );

    let merged = stitch_hits(muon, tracker);
    assert_heights(&merged, &[6.0, 4.0, 2.5, 3.5, 2.0], TOLERANCE, "merged");
    let dets: Vec<SubDetector> = merged.iter().map(|h| h.subdetector()).collect();
    assert_eq!(
        dets,
        vec![
            SubDetector::Muon,
            SubDetector::Muon,
            SubDetector::Tracker,
            SubDetector::Tracker,
            SubDetector::Muon
        ]
    );
}

#[test]
fn test_splice_keeps_hit_identity() {
    let top = mu(0.0, 20.0);
    let upper = mu(0.0, 10.0);
    let lower = mu(0.0, -10.0);
    let t0 = tk(0.0, 1.0);
    let t1 = tk(0.0, -1.0);

    let merged = stitch_hits(
        vec![top.clone(), upper.clone(), lower.clone()],
        vec![t0.clone(), t1.clone()],
    );
    assert_same_hits(&merged, &[top, upper, t0, t1, lower], "merged");
}

#[test]
fn test_bottom_up_tracker_splice_follows_stored_endpoints() {
    let muon = vec![mu(0.0, 20.0), mu(0.0, 10.0), mu(0.0, -10.0), mu(0.0, -20.0)];
    let tracker = vec![tk(0.0, -1.0), tk(0.0, 1.0)];

    let merged = stitch_hits(muon, tracker);
    assert_heights(
        &merged,
        &[20.0, 10.0, -1.0, 1.0, -10.0, -20.0],
        TOLERANCE,
        "merged",
    );
}

#[test]
fn test_invalid_hits_travel_with_their_run() {
    let muon = vec![mu(0.5, 6.0), invalid_mu(), mu(0.5, 10.0)];
    let tracker = vec![tk(0.5, 5.0), tk(0.5, 3.0)];

    let merged = stitch_hits(muon, tracker);
    assert_eq!(merged.len(), 5);
    assert!(!merged[1].is_valid());
    assert_eq!(merged[0].global_position().y, 10.0);
    assert_eq!(merged[2].global_position().y, 6.0);
}

#[test]
fn test_empty_inputs_give_empty_output() {
    assert!(stitch_hits(vec![], vec![]).is_empty());
    assert!(stitch_hits(vec![mu(0.0, 3.0), mu(0.0, 2.0)], vec![]).is_empty());
    assert!(stitch_hits(vec![], vec![tk(0.0, 3.0), tk(0.0, 2.0)]).is_empty());
}

#[test]
fn test_degenerate_inputs_are_rejected() {
    let result = try_stitch_hits(
        vec![invalid_mu(), mu(0.0, 7.0), invalid_mu()],
        vec![tk(0.0, 3.0), tk(0.0, 2.0)],
    );
    assert!(matches!(
        result,
        Err(RejectReason::GeometricDegeneracy { .. })
    ));
}

#[test]
fn test_random_stitch_properties() {
    let mut rng = StdRng::seed_from_u64(42);

    for trial in 0..200 {
        let n_muon = rng.gen_range(2..12);
        let n_tracker = rng.gen_range(2..20);
        let (muon_bottom_up, tracker_bottom_up) = (rng.gen(), rng.gen());
        let muon = random_hits(&mut rng, SubDetector::Muon, n_muon, 800.0, -800.0, muon_bottom_up);
        let tracker = random_hits(
            &mut rng,
            SubDetector::Tracker,
            n_tracker,
            100.0,
            -100.0,
            tracker_bottom_up,
        );
        let expected_len = muon.len() + tracker.len();

        let merged = stitch_hits(muon, tracker);
        let name = format!("trial {}", trial);

        assert_eq!(merged.len(), expected_len, "{}: length", name);
        assert_descending_run(&merged, SubDetector::Muon, &name);
    }
}

#[test]
fn test_random_orientation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let n = rng.gen_range(2..15);
        let bottom_up = rng.gen();
        let mut hits = random_hits(&mut rng, SubDetector::Muon, n, 500.0, -500.0, bottom_up);
        orient_top_down(&mut hits);
        let once = heights(&hits);
        assert_eq!(orient_top_down(&mut hits), Some(false));
        assert_eq!(heights(&hits), once);
    }
}
