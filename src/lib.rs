/*!
# Global cosmic muon reconstruction

Combines a track reconstructed in the muon system with a compatible track
from the inner tracker into one cosmic muon trajectory.

## Pipeline

1. Match the muon track against the event's tracker tracks
2. Re-derive precise hits for tracks without a usable trajectory
3. Orient both hit sets top-to-bottom and stitch them into one sequence
4. Refit the stitched hits from the highest track-end state
5. Accept the result only if the merge added hits beyond the tracker's

## Modules

- [`reco`] - Builder, stitcher, selector, collaborator traits and types
- [`reporter`] - Observability callbacks
- [`common`] - Geometry helpers and text dumps

## Example

```rust,no_run
use cosmic_muon_global_rs::reco::simple::{
    FieldFreeGeometry, HitBuilderMap, InMemoryEvent, SimpleHitBuilder, StraightLinePropagator,
};
use cosmic_muon_global_rs::{BuilderConfig, GlobalCosmicTrajectoryBuilder, TrackCand};
# use cosmic_muon_global_rs::{RecoTrack, Refitter, TrackMatcher};
# fn run(matcher: &dyn TrackMatcher, refitter: &dyn Refitter, muon: &RecoTrack, tracks: Vec<RecoTrack>) {

let config = BuilderConfig::new().with_propagator("StraightLine");
let geometry = FieldFreeGeometry::new()
    .with_propagator("StraightLine", Box::new(StraightLinePropagator));
let builder = GlobalCosmicTrajectoryBuilder::new(config, &geometry, matcher, refitter).unwrap();

let record = HitBuilderMap::new()
    .with_builder("WithTrackAngle", Box::new(SimpleHitBuilder))
    .with_builder("MuonRecHitBuilder", Box::new(SimpleHitBuilder));
let event = InMemoryEvent::new().with_collection("ctfWithMaterialTracksP5", tracks);

let ctx = builder.set_event(&event, &record);
for candidate in builder.trajectories(&ctx, &TrackCand::from_track(muon)) {
    println!("{} measurements", candidate.trajectory().num_measurements());
}
# }
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Global cosmic muon reconstruction
pub mod reco;

/// Observability callbacks for reconstruction attempts
pub mod reporter;

/// Low-level utilities (geometry helpers, text dumps)
pub mod common;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use reco::{
    DetId, Hit, HitRef, HitSequence, MatchMetric, MuonCandidate, PairScores, RawHit, RecoTrack,
    SubDetector, Surface, SurfaceOption, TrackCand, TrackParameters, Trajectory,
    TrajectoryMeasurement, TrajectorySeed, TrajectoryState,
};

// Configuration
pub use reco::{BuilderConfig, BuilderConfigSnapshot, ParameterSet};

// Errors
pub use reco::{ConfigError, RejectReason};

// Traits
pub use reco::{
    EventSource, GeometryService, HitBuilder, HitBuilderRecord, Propagator, Refitter,
    TrackHandle, TrackMatcher,
};

// Builder and algorithms
pub use reco::{
    select_best_match, select_starting_state, stitch_hits, try_stitch_hits, EventContext,
    GlobalCosmicTrajectoryBuilder, StitchPlan,
};

// Reporters
pub use reporter::{BuildReporter, CompositeReporter, DebugReporter, LoggingReporter, NoOpReporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
