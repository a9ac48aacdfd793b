//! Hit, track and service fixtures
//!
//! Tracks run straight down (momentum along -y). Their inner parameters sit
//! at the first stored point and their outer parameters at the last one.

use nalgebra::{Point3, Vector3};
use rand::Rng;

use cosmic_muon_global_rs::reco::config::{
    DEFAULT_MUON_HIT_BUILDER, DEFAULT_PROPAGATOR, DEFAULT_TRACKER_HIT_BUILDER,
};
use cosmic_muon_global_rs::reco::simple::{
    FieldFreeGeometry, HitBuilderMap, SimpleHitBuilder, StraightLinePropagator,
};
use cosmic_muon_global_rs::{
    DetId, Hit, HitRef, HitSequence, RawHit, RecoTrack, SubDetector, Surface, TrackParameters,
};

//=============================================================================
// Hits
//=============================================================================

/// Valid muon-system hit at (x, y, 0)
pub fn mu(x: f64, y: f64) -> HitRef {
    Hit::from_position(DetId::muon(0), Point3::new(x, y, 0.0)).into_ref()
}

/// Valid tracker hit at (x, y, 0)
pub fn tk(x: f64, y: f64) -> HitRef {
    Hit::from_position(DetId::tracker(0), Point3::new(x, y, 0.0)).into_ref()
}

/// Invalid hit on a muon chamber
pub fn invalid_mu() -> HitRef {
    Hit::invalid(DetId::muon(99)).into_ref()
}

/// Vertical positions of a hit sequence
pub fn heights(hits: &[HitRef]) -> Vec<f64> {
    hits.iter().map(|h| h.global_position().y).collect()
}

/// `n` hits of one subsystem at distinct heights between `bottom` and `top`,
/// top-down unless `bottom_up`
pub fn random_hits<R: Rng>(
    rng: &mut R,
    det: SubDetector,
    n: usize,
    top: f64,
    bottom: f64,
    bottom_up: bool,
) -> HitSequence {
    let mut ys: Vec<f64> = (0..n).map(|_| rng.gen_range(bottom..top)).collect();
    ys.sort_by(|a, b| b.total_cmp(a));
    ys.dedup();
    let mut hits: HitSequence = ys
        .into_iter()
        .enumerate()
        .map(|(i, y)| {
            let x = rng.gen_range(-1.0..1.0);
            Hit::from_position(DetId::new(det, i as u32), Point3::new(x, y, 0.0)).into_ref()
        })
        .collect();
    if bottom_up {
        hits.reverse();
    }
    hits
}

//=============================================================================
// Tracks
//=============================================================================

/// Downward-going track parameters at (x, y, 0)
pub fn downward(x: f64, y: f64, surface: DetId) -> TrackParameters {
    TrackParameters::new(
        Point3::new(x, y, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        -1,
        surface,
    )
}

fn track(det: SubDetector, first_index: u32, points: &[(f64, f64)]) -> RecoTrack {
    let ids: Vec<DetId> = (0..points.len())
        .map(|i| DetId::new(det, first_index + i as u32))
        .collect();
    let hits = points
        .iter()
        .zip(&ids)
        .map(|(&(x, y), &id)| RawHit::new(id, Point3::new(x, y, 0.0)))
        .collect();
    let (x0, y0) = points[0];
    let (x1, y1) = points[points.len() - 1];
    RecoTrack::new(
        hits,
        downward(x0, y0, ids[0]),
        downward(x1, y1, ids[ids.len() - 1]),
    )
}

/// Muon-system track through `points`, stored in the given order
pub fn muon_track(points: &[(f64, f64)]) -> RecoTrack {
    track(SubDetector::Muon, 0, points)
}

/// Tracker track through `points`; detector ids start at `first_index`
pub fn tracker_track(first_index: u32, points: &[(f64, f64)]) -> RecoTrack {
    track(SubDetector::Tracker, first_index, points)
}

//=============================================================================
// Services
//=============================================================================

/// Field-free geometry with the default propagator and a horizontal surface
/// at every tracker hit of `tracks`
pub fn geometry_for(tracks: &[RecoTrack]) -> FieldFreeGeometry {
    let mut geometry = FieldFreeGeometry::new()
        .with_propagator(DEFAULT_PROPAGATOR, Box::new(StraightLinePropagator));
    for raw in tracks.iter().flat_map(|t| t.rec_hits()) {
        if raw.subdetector() == SubDetector::Tracker {
            geometry.add_surface(Surface::horizontal(raw.det_id(), raw.position().y));
        }
    }
    geometry
}

/// Both default hit builder names mapped to [`SimpleHitBuilder`]
pub fn default_record() -> HitBuilderMap {
    HitBuilderMap::new()
        .with_builder(DEFAULT_TRACKER_HIT_BUILDER, Box::new(SimpleHitBuilder))
        .with_builder(DEFAULT_MUON_HIT_BUILDER, Box::new(SimpleHitBuilder))
}
