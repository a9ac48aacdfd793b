//! Observability for global cosmic muon reconstruction.
//!
//! This module provides the [`BuildReporter`] trait for debugging and
//! research instrumentation. Reporters receive callbacks at key points of a
//! reconstruction attempt without polluting the core algorithm.
//!
//! # Zero-Cost Abstraction
//!
//! The default [`NoOpReporter`] compiles to zero overhead - all callback
//! methods are empty and will be optimized away by the compiler.
//!
//! # Example
//!
//! ```
//! use cosmic_muon_global_rs::reporter::{BuildReporter, DebugReporter};
//!
//! let mut reporter = DebugReporter::new();
//! reporter.on_tracker_tracks(3);
//! reporter.on_matches(1);
//!
//! assert_eq!(reporter.tracker_track_counts(), &[3]);
//! assert_eq!(reporter.match_counts(), &[1]);
//! ```

use crate::common::display::{format_hits, format_trajectory};
use crate::reco::errors::RejectReason;
use crate::reco::types::{HitRef, PairScores, Trajectory, TrajectoryState};
use crate::reco::LOG_CATEGORY;

// ============================================================================
// BuildReporter Trait
// ============================================================================

/// Observability trait for a reconstruction attempt.
///
/// All methods have default empty implementations, so you only need
/// to override the events you care about.
///
/// Callbacks receive references; clone inside the callback if the data
/// has to outlive it.
pub trait BuildReporter {
    /// Called with the size of the event's tracker-track collection.
    fn on_tracker_tracks(&mut self, _count: usize) {}

    /// Called with the diagnostic scores of each muon/tracker pairing.
    fn on_pair_scores(&mut self, _tracker_idx: usize, _scores: &PairScores) {}

    /// Called with the number of matcher-approved tracker tracks.
    fn on_matches(&mut self, _approved: usize) {}

    /// Called when a tracker track has been chosen.
    ///
    /// `quality` is `None` when the matcher approved a single track.
    fn on_best_match(&mut self, _quality: Option<f64>) {}

    /// Called with both hit sequences before stitching.
    fn on_hits_gathered(&mut self, _muon: &[HitRef], _tracker: &[HitRef]) {}

    /// Called with the merged hit sequence fed to the refitter.
    fn on_hits_stitched(&mut self, _hits: &[HitRef]) {}

    /// Called with the state seeding the refit.
    fn on_starting_state(&mut self, _state: &TrajectoryState) {}

    /// Called after refitting.
    ///
    /// `used_fallback` is true when the permissive fit had to be used.
    fn on_refit(&mut self, _used_fallback: bool, _trajectories: usize) {}

    /// Called when a candidate is emitted.
    fn on_candidate(&mut self, _trajectory: &Trajectory) {}

    /// Called when the attempt ends without a candidate.
    fn on_rejected(&mut self, _reason: &RejectReason) {}
}

// ============================================================================
// NoOpReporter
// ============================================================================

/// Zero-cost reporter that does nothing.
///
/// This is the default reporter used when no observability is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    /// Create a new no-op reporter.
    pub fn new() -> Self {
        Self
    }
}

impl BuildReporter for NoOpReporter {}

// ============================================================================
// DebugReporter
// ============================================================================

/// Reporter that captures all events for debugging.
///
/// Hit sequences are captured as shared handles, so capturing them does
/// not copy hit data.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    tracker_tracks: Vec<usize>,
    pair_scores: Vec<(usize, PairScores)>,
    matches: Vec<usize>,
    best_matches: Vec<Option<f64>>,
    gathered: Vec<(Vec<HitRef>, Vec<HitRef>)>,
    stitched: Vec<Vec<HitRef>>,
    starting_states: Vec<TrajectoryState>,
    refits: Vec<(bool, usize)>,
    candidates: Vec<Trajectory>,
    rejections: Vec<RejectReason>,
}

impl DebugReporter {
    /// Create a new debug reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn tracker_track_counts(&self) -> &[usize] {
        &self.tracker_tracks
    }

    pub fn pair_scores(&self) -> &[(usize, PairScores)] {
        &self.pair_scores
    }

    pub fn match_counts(&self) -> &[usize] {
        &self.matches
    }

    pub fn best_matches(&self) -> &[Option<f64>] {
        &self.best_matches
    }

    /// Captured (muon, tracker) hit sequences before stitching.
    pub fn gathered_hits(&self) -> &[(Vec<HitRef>, Vec<HitRef>)] {
        &self.gathered
    }

    pub fn stitched_hits(&self) -> &[Vec<HitRef>] {
        &self.stitched
    }

    pub fn starting_states(&self) -> &[TrajectoryState] {
        &self.starting_states
    }

    /// Captured (used_fallback, trajectories) refit events.
    pub fn refits(&self) -> &[(bool, usize)] {
        &self.refits
    }

    pub fn candidates(&self) -> &[Trajectory] {
        &self.candidates
    }

    pub fn rejections(&self) -> &[RejectReason] {
        &self.rejections
    }

    /// Total number of captured events across all types.
    pub fn total_events(&self) -> usize {
        self.tracker_tracks.len()
            + self.pair_scores.len()
            + self.matches.len()
            + self.best_matches.len()
            + self.gathered.len()
            + self.stitched.len()
            + self.starting_states.len()
            + self.refits.len()
            + self.candidates.len()
            + self.rejections.len()
    }
}

impl BuildReporter for DebugReporter {
    fn on_tracker_tracks(&mut self, count: usize) {
        self.tracker_tracks.push(count);
    }

    fn on_pair_scores(&mut self, tracker_idx: usize, scores: &PairScores) {
        self.pair_scores.push((tracker_idx, *scores));
    }

    fn on_matches(&mut self, approved: usize) {
        self.matches.push(approved);
    }

    fn on_best_match(&mut self, quality: Option<f64>) {
        self.best_matches.push(quality);
    }

    fn on_hits_gathered(&mut self, muon: &[HitRef], tracker: &[HitRef]) {
        self.gathered.push((muon.to_vec(), tracker.to_vec()));
    }

    fn on_hits_stitched(&mut self, hits: &[HitRef]) {
        self.stitched.push(hits.to_vec());
    }

    fn on_starting_state(&mut self, state: &TrajectoryState) {
        self.starting_states.push(state.clone());
    }

    fn on_refit(&mut self, used_fallback: bool, trajectories: usize) {
        self.refits.push((used_fallback, trajectories));
    }

    fn on_candidate(&mut self, trajectory: &Trajectory) {
        self.candidates.push(trajectory.clone());
    }

    fn on_rejected(&mut self, reason: &RejectReason) {
        self.rejections.push(reason.clone());
    }
}

// ============================================================================
// LoggingReporter
// ============================================================================

/// Reporter that logs events through the `log` facade.
///
/// # Log Levels
///
/// - `on_candidate`: INFO
/// - `on_rejected`, `on_best_match`, `on_refit`: DEBUG
/// - everything else: TRACE
///
/// The verbose mode also dumps hit sequences and the final trajectory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter {
    verbose: bool,
}

impl LoggingReporter {
    /// Create a new logging reporter.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Create a verbose logging reporter that dumps hits and measurements.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl BuildReporter for LoggingReporter {
    fn on_tracker_tracks(&mut self, count: usize) {
        log::trace!(target: LOG_CATEGORY, "Found {} tracker Tracks", count);
    }

    fn on_pair_scores(&mut self, tracker_idx: usize, scores: &PairScores) {
        log::trace!(
            target: LOG_CATEGORY,
            "tracker track {}: chisq is {}, d is {}, r_pos is {}",
            tracker_idx,
            scores.chi2,
            scores.distance,
            scores.position_ratio
        );
    }

    fn on_matches(&mut self, approved: usize) {
        log::trace!(
            target: LOG_CATEGORY,
            "TrackMatcher found {} tracker tracks matched",
            approved
        );
    }

    fn on_best_match(&mut self, quality: Option<f64>) {
        match quality {
            Some(q) => log::debug!(target: LOG_CATEGORY, "Picked tracker track with quality {}", q),
            None => log::debug!(target: LOG_CATEGORY, "Picked the only matched tracker track"),
        }
    }

    fn on_hits_gathered(&mut self, muon: &[HitRef], tracker: &[HitRef]) {
        log::trace!(
            target: LOG_CATEGORY,
            "mu RecHits: {}, tk RecHits: {}",
            muon.len(),
            tracker.len()
        );
    }

    fn on_hits_stitched(&mut self, hits: &[HitRef]) {
        if self.verbose {
            log::trace!(
                target: LOG_CATEGORY,
                "Used RecHits after sort: {}\n{}",
                hits.len(),
                format_hits(hits)
            );
        } else {
            log::trace!(target: LOG_CATEGORY, "Used RecHits after sort: {}", hits.len());
        }
    }

    fn on_starting_state(&mut self, state: &TrajectoryState) {
        log::trace!(
            target: LOG_CATEGORY,
            "firstTSOS pos: {:?} mom: {:?}",
            state.global_position(),
            state.global_momentum()
        );
    }

    fn on_refit(&mut self, used_fallback: bool, trajectories: usize) {
        log::debug!(
            target: LOG_CATEGORY,
            "refit produced {} trajectories (fallback fit: {})",
            trajectories,
            used_fallback
        );
    }

    fn on_candidate(&mut self, trajectory: &Trajectory) {
        log::info!(
            target: LOG_CATEGORY,
            "final global cosmic muon: {} measurements",
            trajectory.num_measurements()
        );
        if let (Some(first), Some(last)) =
            (trajectory.first_measurement(), trajectory.last_measurement())
        {
            log::debug!(
                target: LOG_CATEGORY,
                "spans {:?} to {:?}",
                first.updated_state().global_position(),
                last.updated_state().global_position()
            );
        }
        if self.verbose {
            log::trace!(target: LOG_CATEGORY, "\n{}", format_trajectory(trajectory));
        }
    }

    fn on_rejected(&mut self, reason: &RejectReason) {
        log::debug!(target: LOG_CATEGORY, "rejected ({}): {}", reason.kind(), reason);
    }
}

// ============================================================================
// CompositeReporter
// ============================================================================

/// Reporter that forwards events to two child reporters.
#[derive(Debug, Clone)]
pub struct CompositeReporter<A: BuildReporter, B: BuildReporter> {
    first: A,
    second: B,
}

impl<A: BuildReporter, B: BuildReporter> CompositeReporter<A, B> {
    /// Create a new composite reporter.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    /// Consume and return both reporters.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: BuildReporter, B: BuildReporter> BuildReporter for CompositeReporter<A, B> {
    fn on_tracker_tracks(&mut self, count: usize) {
        self.first.on_tracker_tracks(count);
        self.second.on_tracker_tracks(count);
    }

    fn on_pair_scores(&mut self, tracker_idx: usize, scores: &PairScores) {
        self.first.on_pair_scores(tracker_idx, scores);
        self.second.on_pair_scores(tracker_idx, scores);
    }

    fn on_matches(&mut self, approved: usize) {
        self.first.on_matches(approved);
        self.second.on_matches(approved);
    }

    fn on_best_match(&mut self, quality: Option<f64>) {
        self.first.on_best_match(quality);
        self.second.on_best_match(quality);
    }

    fn on_hits_gathered(&mut self, muon: &[HitRef], tracker: &[HitRef]) {
        self.first.on_hits_gathered(muon, tracker);
        self.second.on_hits_gathered(muon, tracker);
    }

    fn on_hits_stitched(&mut self, hits: &[HitRef]) {
        self.first.on_hits_stitched(hits);
        self.second.on_hits_stitched(hits);
    }

    fn on_starting_state(&mut self, state: &TrajectoryState) {
        self.first.on_starting_state(state);
        self.second.on_starting_state(state);
    }

    fn on_refit(&mut self, used_fallback: bool, trajectories: usize) {
        self.first.on_refit(used_fallback, trajectories);
        self.second.on_refit(used_fallback, trajectories);
    }

    fn on_candidate(&mut self, trajectory: &Trajectory) {
        self.first.on_candidate(trajectory);
        self.second.on_candidate(trajectory);
    }

    fn on_rejected(&mut self, reason: &RejectReason) {
        self.first.on_rejected(reason);
        self.second.on_rejected(reason);
    }
}

// ============================================================================
// Tests
// ============================================================================
