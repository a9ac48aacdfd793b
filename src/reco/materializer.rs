//! Re-derive precise hits from a track's raw hits.
//!
//! Walking the raw hits in stored order, tracker hits are refined at the
//! trajectory state propagated onto their surface; muon hits are built as
//! they are. The output keeps the detector-native order.

use super::traits::{GeometryService, HitBuilder, Propagator};
use super::types::{HitSequence, RecoTrack, SubDetector};
use super::LOG_CATEGORY;

/// Builds precise hit sequences for tracks without a usable trajectory
pub struct HitMaterializer<'a> {
    geometry: &'a dyn GeometryService,
    propagator: &'a dyn Propagator,
    tracker_builder: &'a dyn HitBuilder,
    muon_builder: &'a dyn HitBuilder,
}

impl<'a> HitMaterializer<'a> {
    pub fn new(
        geometry: &'a dyn GeometryService,
        propagator: &'a dyn Propagator,
        tracker_builder: &'a dyn HitBuilder,
        muon_builder: &'a dyn HitBuilder,
    ) -> Self {
        Self {
            geometry,
            propagator,
            tracker_builder,
            muon_builder,
        }
    }

    /// Precise hits of `track`, in stored order.
    ///
    /// Invalid raw hits are skipped. A tracker hit whose surface is unknown
    /// or cannot be reached by the propagator is dropped; a muon hit is
    /// always kept.
    pub fn materialize(&self, track: &RecoTrack) -> HitSequence {
        let mut result = HitSequence::with_capacity(track.rec_hits().len());
        let mut current = self.geometry.inner_state(track);

        for raw in track.rec_hits().iter().filter(|h| h.is_valid()) {
            match raw.subdetector() {
                SubDetector::Tracker => {
                    let hit = self.tracker_builder.build(raw);
                    let Some(surface) = self.geometry.surface(raw.det_id()) else {
                        log::trace!(target: LOG_CATEGORY, "no surface for {:?}", raw.det_id());
                        continue;
                    };
                    let predicted = self.propagator.propagate(&current, &surface);
                    log::trace!(target: LOG_CATEGORY, "predtsos {}", predicted.is_valid());
                    if predicted.is_valid() {
                        current = predicted;
                        result.push(self.tracker_builder.clone_at(&hit, &current));
                    }
                }
                SubDetector::Muon => result.push(self.muon_builder.build(raw)),
            }
        }

        result
    }
}
