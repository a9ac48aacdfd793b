//! Collaborator interfaces
//!
//! The builder consumes event data, geometry, hit builders, the track
//! matcher and the refitter through these traits. Implementations are
//! borrowed for the duration of one event and must not change while the
//! event is processed.

use std::rc::Rc;

use super::types::{
    DetId, Hit, HitRef, MatchMetric, RawHit, RecoTrack, Surface, SurfaceOption, TrackCand,
    Trajectory, TrajectorySeed, TrajectoryState,
};

/// Result of fetching a collection from the event
#[derive(Debug, Clone, Copy)]
pub struct TrackHandle<'ev> {
    tracks: Option<&'ev [RecoTrack]>,
}

impl<'ev> TrackHandle<'ev> {
    /// Handle to a fetched collection
    pub fn valid(tracks: &'ev [RecoTrack]) -> Self {
        Self {
            tracks: Some(tracks),
        }
    }

    /// Handle for a failed fetch
    pub fn invalid() -> Self {
        Self { tracks: None }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.tracks.is_some()
    }

    /// The collection, if the fetch succeeded
    pub fn get(&self) -> Option<&'ev [RecoTrack]> {
        self.tracks
    }
}

/// Event data access
pub trait EventSource {
    /// Fetch the tracker-track collection stored under `label`
    fn tracker_tracks(&self, label: &str) -> TrackHandle<'_>;
}

/// Converts raw detector hits into precise hits
pub trait HitBuilder {
    /// Build the precise hit for a raw hit
    fn build(&self, raw: &RawHit) -> HitRef;

    /// Rebuild a hit using the trajectory state at its surface.
    ///
    /// The default refines the hit with the state's momentum direction.
    fn clone_at(&self, hit: &Hit, state: &TrajectoryState) -> HitRef {
        let momentum = state.global_momentum();
        let direction = if momentum.norm() > 0.0 {
            momentum.normalize()
        } else {
            momentum
        };
        Rc::new(hit.refined(direction))
    }
}

/// Conditions record holding the named hit builders
pub trait HitBuilderRecord {
    /// Look up a hit builder by name
    fn hit_builder(&self, name: &str) -> Option<&dyn HitBuilder>;
}

/// Moves a trajectory state onto a surface
pub trait Propagator {
    /// Propagate `state` to `surface`.
    ///
    /// Returns [`TrajectoryState::invalid`] when the surface cannot be reached.
    fn propagate(&self, state: &TrajectoryState, surface: &Surface) -> TrajectoryState;
}

/// Tracking geometry, magnetic field and propagators
pub trait GeometryService {
    /// State at the track's innermost hit surface
    fn inner_state(&self, track: &RecoTrack) -> TrajectoryState;

    /// State at the track's outermost hit surface
    fn outer_state(&self, track: &RecoTrack) -> TrajectoryState;

    /// Surface of a detector element
    fn surface(&self, id: DetId) -> Option<Surface>;

    /// Look up a propagator by name
    fn propagator(&self, name: &str) -> Option<&dyn Propagator>;
}

/// Scores and selects muon/tracker track pairings
pub trait TrackMatcher {
    /// Distance between the two candidates under `metric`, evaluated at `surface`
    fn score(
        &self,
        muon: &TrackCand<'_>,
        tracker: &TrackCand<'_>,
        metric: MatchMetric,
        surface: SurfaceOption,
    ) -> f64;

    /// Subset of `candidates` compatible with `muon`, in input order
    fn select_matches<'a>(
        &self,
        muon: &TrackCand<'_>,
        candidates: &[TrackCand<'a>],
    ) -> Vec<TrackCand<'a>>;
}

/// Trajectory smoother/fitter
pub trait Refitter {
    /// Refit the hits starting from `start`
    fn refit(
        &self,
        seed: &TrajectorySeed,
        hits: &[HitRef],
        start: &TrajectoryState,
    ) -> Vec<Trajectory>;

    /// More permissive fit used when [`Refitter::refit`] returns nothing
    fn fit(
        &self,
        seed: &TrajectorySeed,
        hits: &[HitRef],
        start: &TrajectoryState,
    ) -> Vec<Trajectory>;
}
