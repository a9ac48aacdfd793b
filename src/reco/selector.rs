//! Best-match selection among matcher-approved tracker candidates.

use super::traits::TrackMatcher;
use super::types::{MatchMetric, SurfaceOption, TrackCand};
use super::LOG_CATEGORY;

/// Starting value of the running best quality.
///
/// Candidates scoring at or above it are never selected.
pub const INITIAL_BEST_QUALITY: f64 = 1e6;

/// Outcome of best-match selection
#[derive(Debug, Clone, Copy)]
pub struct BestMatch<'a> {
    /// Selected tracker candidate
    pub candidate: TrackCand<'a>,
    /// Secondary metric of the selection, `None` when the candidate was the
    /// only approved one
    pub quality: Option<f64>,
}

/// Pick one tracker candidate among the approved ones.
///
/// A single approved candidate is taken without scoring. Otherwise each is
/// scored by distance at the innermost muon hit surface and the strictly
/// smallest score wins; ties keep the first-seen candidate.
pub fn select_best_match<'a>(
    matcher: &dyn TrackMatcher,
    muon: &TrackCand<'_>,
    approved: &[TrackCand<'a>],
) -> Option<BestMatch<'a>> {
    match approved {
        [] => None,
        [only] => Some(BestMatch {
            candidate: *only,
            quality: None,
        }),
        _ => {
            let mut best: Option<TrackCand<'a>> = None;
            let mut best_quality = INITIAL_BEST_QUALITY;
            for candidate in approved {
                let quality = matcher.score(
                    muon,
                    candidate,
                    MatchMetric::Distance,
                    SurfaceOption::InnermostMuonSurface,
                );
                log::trace!(target: LOG_CATEGORY, " quality of tracker track is {}", quality);
                if quality < best_quality {
                    best_quality = quality;
                    best = Some(*candidate);
                }
            }
            log::trace!(
                target: LOG_CATEGORY,
                " Picked tracker track with quality {}",
                best_quality
            );
            best.map(|candidate| BestMatch {
                candidate,
                quality: Some(best_quality),
            })
        }
    }
}
