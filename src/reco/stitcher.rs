//! Hit stitching: merge muon-system and tracker hits into one ordered sequence.
//!
//! Cosmic muons cross the detector from top to bottom, so both input
//! sequences are first oriented to run from higher to lower `y`. The muon
//! sequence is then searched for a closest-approach boundary, a pair of
//! consecutive hits whose midpoint is closer to the beam axis than either
//! hit. When one exists the track passed through the tracker volume between
//! those two hits and the tracker hits are spliced in there. Otherwise the
//! two sequences are concatenated, higher-starting sequence first.
//!
//! The merge decision is computed once as a [`StitchPlan`] by
//! [`plan_stitch`] and then executed.

use nalgebra::distance;

use crate::common::display::format_hits;
use crate::common::geometry::passes_closer_to_axis;

use super::errors::RejectReason;
use super::types::{HitRef, HitSequence};
use super::LOG_CATEGORY;

/// How the tracker hits join the muon hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchPlan {
    /// Splice the tracker hits right after the muon hit at `joint`
    InsertAfter {
        /// Index of the muon hit preceding the closest-approach boundary
        joint: usize,
        /// Reverse the oriented tracker hits before splicing
        reverse_tracker: bool,
    },
    /// Muon hits first, tracker hits after
    AppendTracker,
    /// Tracker hits first, muon hits after
    PrependTracker,
}

/// Indices of the first and last valid hit.
///
/// Scans inward from both ends and stops when the scans meet. Returns `None`
/// for empty sequences and when fewer than two distinct valid hits exist.
pub fn valid_endpoints(hits: &[HitRef]) -> Option<(usize, usize)> {
    if hits.is_empty() {
        return None;
    }
    let mut front = 0;
    let mut back = hits.len() - 1;
    while !hits[front].is_valid() && front != back {
        front += 1;
    }
    while !hits[back].is_valid() && back != front {
        back -= 1;
    }
    if front == back {
        None
    } else {
        Some((front, back))
    }
}

/// Orient a sequence from higher to lower `y`, in place.
///
/// Reverses when the first valid hit lies below the last valid hit.
/// Returns whether the sequence was reversed, or `None` if it has no two
/// distinct valid endpoints (the sequence is left untouched).
pub fn orient_top_down(hits: &mut [HitRef]) -> Option<bool> {
    let (front, back) = valid_endpoints(hits)?;
    let reverse = hits[front].global_position().y < hits[back].global_position().y;
    if reverse {
        hits.reverse();
    }
    Some(reverse)
}

/// First closest-approach boundary of an oriented muon sequence.
///
/// Returns the index of the hit before the boundary.
pub fn find_joint(hits: &[HitRef]) -> Option<usize> {
    hits.windows(2).position(|pair| {
        passes_closer_to_axis(&pair[0].global_position(), &pair[1].global_position())
    })
}

/// Decide how two oriented sequences are merged.
///
/// `tracker_reversed` tells whether orienting the tracker hits reversed
/// their stored order. The splice direction is decided on the stored-order
/// endpoints: the tracker hits are reversed once more when the stored first
/// valid hit is farther from the joint hit than the stored last one.
///
/// Returns `None` if either sequence lacks two distinct valid endpoints.
pub fn plan_stitch(
    muon: &[HitRef],
    tracker: &[HitRef],
    tracker_reversed: bool,
) -> Option<StitchPlan> {
    let (mu_front, _) = valid_endpoints(muon)?;
    let (tk_front, tk_back) = valid_endpoints(tracker)?;

    if let Some(joint) = find_joint(muon) {
        let joint_pos = muon[joint].global_position();
        log::trace!(target: LOG_CATEGORY, "jointpoint {:?}", joint_pos);
        let (stored_front, stored_back) = if tracker_reversed {
            (tk_back, tk_front)
        } else {
            (tk_front, tk_back)
        };
        let front_dist = distance(&tracker[stored_front].global_position(), &joint_pos);
        let back_dist = distance(&tracker[stored_back].global_position(), &joint_pos);
        return Some(StitchPlan::InsertAfter {
            joint,
            reverse_tracker: front_dist > back_dist,
        });
    }

    let tk_y = tracker[tk_front].global_position().y;
    let mu_y = muon[mu_front].global_position().y;
    if tk_y < mu_y {
        Some(StitchPlan::AppendTracker)
    } else {
        Some(StitchPlan::PrependTracker)
    }
}

/// Execute a plan produced by [`plan_stitch`] on the same sequences.
///
/// Returns `None` if an `InsertAfter` joint is out of bounds for `muon`.
pub(crate) fn apply_plan(
    plan: StitchPlan,
    mut muon: HitSequence,
    mut tracker: HitSequence,
) -> Option<HitSequence> {
    match plan {
        StitchPlan::InsertAfter {
            joint,
            reverse_tracker,
        } => {
            if joint >= muon.len() {
                return None;
            }
            if reverse_tracker {
                tracker.reverse();
            }
            let tail = muon.split_off(joint + 1);
            muon.extend(tracker);
            muon.extend(tail);
            Some(muon)
        }
        StitchPlan::AppendTracker => {
            muon.extend(tracker);
            Some(muon)
        }
        StitchPlan::PrependTracker => {
            tracker.extend(muon);
            Some(tracker)
        }
    }
}

/// Orient and merge the two hit sequences.
///
/// Fails with [`RejectReason::GeometricDegeneracy`] if either sequence is
/// empty or lacks two distinct valid endpoints.
pub fn try_stitch_hits(
    mut muon: HitSequence,
    mut tracker: HitSequence,
) -> Result<HitSequence, RejectReason> {
    if tracker.is_empty() {
        log::trace!(target: LOG_CATEGORY, "No valid tracker hits");
        return Err(RejectReason::degenerate("no tracker hits"));
    }
    if muon.is_empty() {
        log::trace!(target: LOG_CATEGORY, "No valid muon hits");
        return Err(RejectReason::degenerate("no muon hits"));
    }
    if valid_endpoints(&tracker).is_none() {
        log::trace!(target: LOG_CATEGORY, "No valid tracker hits");
        return Err(RejectReason::degenerate("tracker hits have no direction"));
    }
    if valid_endpoints(&muon).is_none() {
        log::trace!(target: LOG_CATEGORY, "No valid muon hits");
        return Err(RejectReason::degenerate("muon hits have no direction"));
    }

    let tracker_reversed = orient_top_down(&mut tracker).unwrap_or(false);
    orient_top_down(&mut muon);

    if log::log_enabled!(target: LOG_CATEGORY, log::Level::Trace) {
        log::trace!(
            target: LOG_CATEGORY,
            "tkHits after sort: {}\n{}",
            tracker.len(),
            format_hits(&tracker)
        );
        log::trace!(
            target: LOG_CATEGORY,
            "muonHits after sort: {}\n{}",
            muon.len(),
            format_hits(&muon)
        );
    }

    let plan = plan_stitch(&muon, &tracker, tracker_reversed)
        .ok_or_else(|| RejectReason::degenerate("hits have no direction"))?;
    log::trace!(target: LOG_CATEGORY, "stitch plan {:?}", plan);

    apply_plan(plan, muon, tracker)
        .ok_or_else(|| RejectReason::degenerate("joint out of range"))
}

/// Orient and merge the two hit sequences, yielding an empty sequence when
/// either input is unusable.
pub fn stitch_hits(muon: HitSequence, tracker: HitSequence) -> HitSequence {
    try_stitch_hits(muon, tracker).unwrap_or_default()
}
