//! Global cosmic muon trajectory builder.
//!
//! [`GlobalCosmicTrajectoryBuilder`] takes one muon-system candidate and the
//! tracker tracks of the event and produces at most one combined
//! [`MuonCandidate`]. Per-event lookups are done once by
//! [`GlobalCosmicTrajectoryBuilder::set_event`] and carried in an
//! [`EventContext`].

use crate::reporter::{BuildReporter, NoOpReporter};

use super::config::BuilderConfig;
use super::errors::{ConfigError, RejectReason};
use super::materializer::HitMaterializer;
use super::selector::select_best_match;
use super::stitcher::try_stitch_hits;
use super::traits::{
    EventSource, GeometryService, HitBuilder, HitBuilderRecord, Refitter, TrackHandle,
    TrackMatcher,
};
use super::types::{
    HitSequence, MatchMetric, MuonCandidate, PairScores, RecoTrack, SurfaceOption, TrackCand,
    TrajectorySeed, TrajectoryState,
};
use super::LOG_CATEGORY;

// ============================================================================
// Event context
// ============================================================================

/// Inputs looked up once per event
#[derive(Clone, Copy)]
pub struct EventContext<'ev> {
    tracker_tracks: TrackHandle<'ev>,
    tracker_hit_builder: Option<&'ev dyn HitBuilder>,
    muon_hit_builder: Option<&'ev dyn HitBuilder>,
}

impl<'ev> EventContext<'ev> {
    pub fn new(
        tracker_tracks: TrackHandle<'ev>,
        tracker_hit_builder: Option<&'ev dyn HitBuilder>,
        muon_hit_builder: Option<&'ev dyn HitBuilder>,
    ) -> Self {
        Self {
            tracker_tracks,
            tracker_hit_builder,
            muon_hit_builder,
        }
    }

    /// Tracker-track collection handle
    pub fn tracker_tracks(&self) -> TrackHandle<'ev> {
        self.tracker_tracks
    }

    pub fn tracker_hit_builder(&self) -> Option<&'ev dyn HitBuilder> {
        self.tracker_hit_builder
    }

    pub fn muon_hit_builder(&self) -> Option<&'ev dyn HitBuilder> {
        self.muon_hit_builder
    }
}

// ============================================================================
// Starting state
// ============================================================================

/// Highest of the four track-end states.
///
/// The inner states are compared first, then the outer states, then the two
/// winners. Invalid states rank below every valid one. Within a pair the
/// tracker state wins a tie; between the pairs the outer winner does.
pub fn select_starting_state(
    muon_inner: TrajectoryState,
    tracker_inner: TrajectoryState,
    muon_outer: TrajectoryState,
    tracker_outer: TrajectoryState,
) -> TrajectoryState {
    let inner = higher(muon_inner, tracker_inner);
    let outer = higher(muon_outer, tracker_outer);
    higher(inner, outer)
}

/// `first` if strictly higher, otherwise `second`
fn higher(first: TrajectoryState, second: TrajectoryState) -> TrajectoryState {
    if first.height() > second.height() {
        first
    } else {
        second
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Matches a muon-system track with a tracker track and refits them as one
/// cosmic muon trajectory.
///
/// Services are borrowed for the builder's lifetime; per-event inputs come
/// through an [`EventContext`].
pub struct GlobalCosmicTrajectoryBuilder<'s> {
    config: BuilderConfig,
    geometry: &'s dyn GeometryService,
    matcher: &'s dyn TrackMatcher,
    refitter: &'s dyn Refitter,
}

impl<'s> GlobalCosmicTrajectoryBuilder<'s> {
    /// Create a builder after validating `config`
    pub fn new(
        config: BuilderConfig,
        geometry: &'s dyn GeometryService,
        matcher: &'s dyn TrackMatcher,
        refitter: &'s dyn Refitter,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            target: LOG_CATEGORY,
            "builder configured: {}",
            config.snapshot().to_json()
        );
        Ok(Self {
            config,
            geometry,
            matcher,
            refitter,
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Look up the tracker-track collection and the hit builders for an event
    pub fn set_event<'ev>(
        &self,
        event: &'ev dyn EventSource,
        record: &'ev dyn HitBuilderRecord,
    ) -> EventContext<'ev> {
        let tracker_tracks = event.tracker_tracks(&self.config.tracker_track_label);
        if !tracker_tracks.is_valid() {
            log::trace!(
                target: LOG_CATEGORY,
                "no tracker track collection labelled {}",
                self.config.tracker_track_label
            );
        }
        EventContext::new(
            tracker_tracks,
            record.hit_builder(&self.config.tracker_hit_builder),
            record.hit_builder(&self.config.muon_hit_builder),
        )
    }

    /// Combined trajectories for one muon candidate: zero or one.
    pub fn trajectories<'ev>(
        &self,
        ctx: &EventContext<'ev>,
        muon: &TrackCand<'ev>,
    ) -> Vec<MuonCandidate<'ev>> {
        self.trajectories_with_reporter(ctx, muon, &mut NoOpReporter)
    }

    /// [`GlobalCosmicTrajectoryBuilder::trajectories`] with observability
    pub fn trajectories_with_reporter<'ev, R: BuildReporter>(
        &self,
        ctx: &EventContext<'ev>,
        muon: &TrackCand<'ev>,
        reporter: &mut R,
    ) -> Vec<MuonCandidate<'ev>> {
        match self.reconstruct(ctx, muon, reporter) {
            Ok(candidate) => vec![candidate],
            Err(reason) => {
                log::trace!(target: LOG_CATEGORY, "no candidate: {}", reason);
                reporter.on_rejected(&reason);
                Vec::new()
            }
        }
    }

    /// One reconstruction attempt, reporting why it produced nothing.
    pub fn reconstruct<'ev, R: BuildReporter>(
        &self,
        ctx: &EventContext<'ev>,
        muon: &TrackCand<'ev>,
        reporter: &mut R,
    ) -> Result<MuonCandidate<'ev>, RejectReason> {
        let tracks = ctx.tracker_tracks().get().ok_or_else(|| {
            log::trace!(target: LOG_CATEGORY, "Tracker Track collection is invalid!!!");
            RejectReason::missing("tracker track collection is invalid")
        })?;
        reporter.on_tracker_tracks(tracks.len());
        if tracks.is_empty() {
            return Err(RejectReason::missing("tracker track collection is empty"));
        }
        let muon_track = muon
            .track()
            .ok_or_else(|| RejectReason::missing("muon candidate has no track"))?;

        let tracker_cands: Vec<TrackCand<'ev>> =
            tracks.iter().map(TrackCand::from_track).collect();

        if self.config.diagnostic_scores {
            self.score_pairs(muon, &tracker_cands, reporter);
        }

        // Matching
        let approved = self.matcher.select_matches(muon, &tracker_cands);
        reporter.on_matches(approved.len());
        if approved.is_empty() {
            return Err(RejectReason::no_match("track matcher approved no tracker track"));
        }

        let best = select_best_match(self.matcher, muon, &approved)
            .ok_or_else(|| RejectReason::no_match("no approved tracker track scored below cut"))?;
        reporter.on_best_match(best.quality);
        let tracker_track = best
            .candidate
            .track()
            .ok_or_else(|| RejectReason::missing("selected tracker track is null"))?;

        // Hits
        let materializer = self.materializer(ctx)?;
        let muon_hits: HitSequence = match muon.usable_trajectory() {
            Some(trajectory) => trajectory.rec_hits(),
            None => materializer.materialize(muon_track),
        };
        let tracker_hits = match best.candidate.usable_trajectory() {
            Some(trajectory) => trajectory.rec_hits(),
            None => materializer.materialize(tracker_track),
        };
        reporter.on_hits_gathered(&muon_hits, &tracker_hits);

        let hits = try_stitch_hits(muon_hits, tracker_hits)?;
        log::trace!(target: LOG_CATEGORY, "{} hits after stitching", hits.len());
        reporter.on_hits_stitched(&hits);

        // Starting state
        let start = self.starting_state(muon_track, tracker_track);
        if !start.is_valid() {
            return Err(RejectReason::no_match("no valid starting state"));
        }
        reporter.on_starting_state(&start);

        // Refit
        let seed = TrajectorySeed::empty();
        let mut refitted = self.refitter.refit(&seed, &hits, &start);
        let used_fallback = refitted.is_empty();
        if used_fallback {
            log::trace!(target: LOG_CATEGORY, "refit empty, trying fit");
            refitted = self.refitter.fit(&seed, &hits, &start);
        }
        reporter.on_refit(used_fallback, refitted.len());
        let trajectory = refitted.into_iter().next().ok_or_else(|| {
            log::trace!(target: LOG_CATEGORY, "smoothing failed");
            RejectReason::FitFailure
        })?;

        // Acceptance
        let measurements = trajectory.num_measurements();
        log::trace!(
            target: LOG_CATEGORY,
            "measurements in final trajectory {}",
            measurements
        );
        log::trace!(
            target: LOG_CATEGORY,
            "Originally there are {} tk rhs and {} mu rhs.",
            tracker_track.found(),
            muon_track.found()
        );
        // Heuristic: the merge must add at least one hit beyond the tracker's
        if measurements <= tracker_track.found() {
            return Err(RejectReason::InsufficientResult {
                measurements,
                tracker_hits: tracker_track.found(),
            });
        }

        reporter.on_candidate(&trajectory);
        Ok(MuonCandidate::new(trajectory, muon_track, tracker_track))
    }

    fn score_pairs<R: BuildReporter>(
        &self,
        muon: &TrackCand<'_>,
        tracker_cands: &[TrackCand<'_>],
        reporter: &mut R,
    ) {
        let surface = SurfaceOption::InnermostMuonSurface;
        for (idx, tracker) in tracker_cands.iter().enumerate() {
            let scores = PairScores {
                chi2: self.matcher.score(muon, tracker, MatchMetric::Chi2, surface),
                distance: self
                    .matcher
                    .score(muon, tracker, MatchMetric::Distance, surface),
                position_ratio: self
                    .matcher
                    .score(muon, tracker, MatchMetric::PositionRatio, surface),
            };
            reporter.on_pair_scores(idx, &scores);
        }
    }

    fn materializer<'a>(
        &'a self,
        ctx: &'a EventContext<'_>,
    ) -> Result<HitMaterializer<'a>, RejectReason> {
        let propagator = self.geometry.propagator(&self.config.propagator).ok_or_else(|| {
            RejectReason::missing(format!("no propagator named {}", self.config.propagator))
        })?;
        let tracker_builder = ctx.tracker_hit_builder().ok_or_else(|| {
            RejectReason::missing(format!(
                "no hit builder named {}",
                self.config.tracker_hit_builder
            ))
        })?;
        let muon_builder = ctx.muon_hit_builder().ok_or_else(|| {
            RejectReason::missing(format!(
                "no hit builder named {}",
                self.config.muon_hit_builder
            ))
        })?;
        Ok(HitMaterializer::new(
            self.geometry,
            propagator,
            tracker_builder,
            muon_builder,
        ))
    }

    fn starting_state(&self, muon: &RecoTrack, tracker: &RecoTrack) -> TrajectoryState {
        select_starting_state(
            self.geometry.inner_state(muon),
            self.geometry.inner_state(tracker),
            self.geometry.outer_state(muon),
            self.geometry.outer_state(tracker),
        )
    }
}
