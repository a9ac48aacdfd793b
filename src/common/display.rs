//! Text dumps of hit sequences and trajectories for trace logging

use std::fmt::Write;

use crate::reco::types::{HitRef, Trajectory};

/// One line per hit: index, subsystem, validity and global position
pub fn format_hits(hits: &[HitRef]) -> String {
    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        let pos = hit.global_position();
        let _ = writeln!(
            out,
            "  {:>3} {} {} ({:.3}, {:.3}, {:.3})",
            i,
            hit.subdetector().label(),
            if hit.is_valid() { "valid  " } else { "invalid" },
            pos.x,
            pos.y,
            pos.z
        );
    }
    out
}

/// One line per measurement: updated position and momentum
pub fn format_trajectory(trajectory: &Trajectory) -> String {
    let mut out = String::new();
    for tm in trajectory.measurements() {
        let state = tm.updated_state();
        let pos = state.global_position();
        let mom = state.global_momentum();
        let _ = writeln!(
            out,
            "  updated pos ({:.3}, {:.3}, {:.3}) mom ({:.3}, {:.3}, {:.3})",
            pos.x, pos.y, pos.z, mom.x, mom.y, mom.z
        );
    }
    out
}
