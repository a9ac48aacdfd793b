//! Global cosmic muon reconstruction.
//!
//! A muon-system track is matched with a tracker track of the same event,
//! the hits of both are stitched into one top-to-bottom sequence and a
//! single trajectory is refitted through them.
//!
//! - [`builder`] - Orchestration and acceptance gate
//! - [`stitcher`] - Hit orientation and merging
//! - [`selector`] - Best match among approved tracker tracks
//! - [`materializer`] - Precise hits from raw track hits
//! - [`traits`] - Collaborator interfaces
//! - [`simple`] - Field-free collaborator implementations

pub mod builder;
pub mod config;
pub mod errors;
pub mod materializer;
pub mod selector;
pub mod simple;
pub mod stitcher;
pub mod traits;
pub mod types;

/// Log target of every message emitted during reconstruction
pub const LOG_CATEGORY: &str = "Muon|RecoMuon|CosmicMuon|GlobalCosmicMuonTrajectoryBuilder";

pub use builder::{select_starting_state, EventContext, GlobalCosmicTrajectoryBuilder};
pub use config::{BuilderConfig, BuilderConfigSnapshot, ParameterSet};
pub use errors::{ConfigError, RejectReason};
pub use materializer::HitMaterializer;
pub use selector::{select_best_match, BestMatch};
pub use stitcher::{stitch_hits, try_stitch_hits, StitchPlan};
pub use traits::{
    EventSource, GeometryService, HitBuilder, HitBuilderRecord, Propagator, Refitter,
    TrackHandle, TrackMatcher,
};
pub use types::{
    DetId, Hit, HitRef, HitSequence, MatchMetric, MuonCandidate, PairScores, RawHit, RecoTrack,
    SubDetector, Surface, SurfaceOption, TrackCand, TrackParameters, Trajectory,
    TrajectoryMeasurement, TrajectorySeed, TrajectoryState,
};
