//! Mock matcher and refitter with call accounting

use std::cell::{Cell, RefCell};

use cosmic_muon_global_rs::{
    HitRef, MatchMetric, Refitter, SurfaceOption, TrackCand, TrackMatcher, Trajectory,
    TrajectoryMeasurement, TrajectorySeed, TrajectoryState,
};

//=============================================================================
// Matcher
//=============================================================================

/// Matcher scoring pairings by the horizontal offset of their inner positions.
///
/// Candidates whose offset is within `max_offset` are approved. Chi2 and
/// position-ratio scores are the offset scaled by 10 and 100.
pub struct MockMatcher {
    max_offset: f64,
    score_calls: Cell<usize>,
    select_calls: Cell<usize>,
}

impl MockMatcher {
    pub fn new(max_offset: f64) -> Self {
        Self {
            max_offset,
            score_calls: Cell::new(0),
            select_calls: Cell::new(0),
        }
    }

    /// Approves every candidate
    pub fn approve_all() -> Self {
        Self::new(f64::INFINITY)
    }

    /// Approves nothing
    pub fn approve_none() -> Self {
        Self::new(-1.0)
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.get()
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.get()
    }

    fn offset(muon: &TrackCand<'_>, tracker: &TrackCand<'_>) -> f64 {
        match (muon.track(), tracker.track()) {
            (Some(m), Some(t)) => {
                (m.inner_parameters().position.x - t.inner_parameters().position.x).abs()
            }
            _ => f64::MAX,
        }
    }
}

impl TrackMatcher for MockMatcher {
    fn score(
        &self,
        muon: &TrackCand<'_>,
        tracker: &TrackCand<'_>,
        metric: MatchMetric,
        _surface: SurfaceOption,
    ) -> f64 {
        self.score_calls.set(self.score_calls.get() + 1);
        let offset = Self::offset(muon, tracker);
        match metric {
            MatchMetric::Chi2 => offset * 10.0,
            MatchMetric::Distance => offset,
            MatchMetric::PositionRatio => offset * 100.0,
        }
    }

    fn select_matches<'a>(
        &self,
        muon: &TrackCand<'_>,
        candidates: &[TrackCand<'a>],
    ) -> Vec<TrackCand<'a>> {
        self.select_calls.set(self.select_calls.get() + 1);
        candidates
            .iter()
            .filter(|c| Self::offset(muon, c) <= self.max_offset)
            .copied()
            .collect()
    }
}

//=============================================================================
// Refitter
//=============================================================================

/// What one fit attempt returns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    /// No trajectory
    Empty,
    /// One measurement per hit
    AllHits,
    /// One measurement for each of the first `n` hits
    FirstHits(usize),
}

/// Refitter producing straight trajectories through the given hits
pub struct MockRefitter {
    refit: FitOutcome,
    fit: FitOutcome,
    refit_calls: Cell<usize>,
    fit_calls: Cell<usize>,
    last_hits: RefCell<Vec<HitRef>>,
    last_start: RefCell<Option<TrajectoryState>>,
    last_seed_hits: Cell<Option<usize>>,
}

impl MockRefitter {
    pub fn new(refit: FitOutcome, fit: FitOutcome) -> Self {
        Self {
            refit,
            fit,
            refit_calls: Cell::new(0),
            fit_calls: Cell::new(0),
            last_hits: RefCell::new(Vec::new()),
            last_start: RefCell::new(None),
            last_seed_hits: Cell::new(None),
        }
    }

    /// Refit succeeds with every hit measured
    pub fn working() -> Self {
        Self::new(FitOutcome::AllHits, FitOutcome::AllHits)
    }

    pub fn refit_calls(&self) -> usize {
        self.refit_calls.get()
    }

    pub fn fit_calls(&self) -> usize {
        self.fit_calls.get()
    }

    /// Hits passed to the most recent attempt
    pub fn last_hits(&self) -> Vec<HitRef> {
        self.last_hits.borrow().clone()
    }

    /// Starting state of the most recent attempt
    pub fn last_start(&self) -> Option<TrajectoryState> {
        self.last_start.borrow().clone()
    }

    /// Number of hits in the seed of the most recent attempt
    pub fn last_seed_hits(&self) -> Option<usize> {
        self.last_seed_hits.get()
    }

    fn attempt(
        &self,
        outcome: FitOutcome,
        seed: &TrajectorySeed,
        hits: &[HitRef],
        start: &TrajectoryState,
    ) -> Vec<Trajectory> {
        self.last_seed_hits.set(Some(seed.hits().len()));
        *self.last_hits.borrow_mut() = hits.to_vec();
        *self.last_start.borrow_mut() = Some(start.clone());

        let kept = match outcome {
            FitOutcome::Empty => return Vec::new(),
            FitOutcome::AllHits => hits.len(),
            FitOutcome::FirstHits(n) => n.min(hits.len()),
        };
        let measurements = hits[..kept]
            .iter()
            .map(|hit| {
                let state = TrajectoryState::new(
                    hit.global_position(),
                    start.global_momentum(),
                    start.charge(),
                    Some(hit.det_id()),
                );
                TrajectoryMeasurement::new(hit.clone(), state)
            })
            .collect();
        vec![Trajectory::from_measurements(measurements)]
    }
}

impl Refitter for MockRefitter {
    fn refit(
        &self,
        seed: &TrajectorySeed,
        hits: &[HitRef],
        start: &TrajectoryState,
    ) -> Vec<Trajectory> {
        self.refit_calls.set(self.refit_calls.get() + 1);
        self.attempt(self.refit, seed, hits, start)
    }

    fn fit(
        &self,
        seed: &TrajectorySeed,
        hits: &[HitRef],
        start: &TrajectoryState,
    ) -> Vec<Trajectory> {
        self.fit_calls.set(self.fit_calls.get() + 1);
        self.attempt(self.fit, seed, hits, start)
    }
}
