//! Simple collaborator implementations.
//!
//! Field-free geometry with straight-line propagation, a hit builder that
//! measures raw positions, an in-memory event and a named hit-builder
//! record. Enough to drive the builder without a detector description.

use std::collections::HashMap;

use super::traits::{
    EventSource, GeometryService, HitBuilder, HitBuilderRecord, Propagator, TrackHandle,
};
use super::types::{
    DetId, Hit, HitRef, RawHit, RecoTrack, Surface, TrackParameters, TrajectoryState,
};

/// Directions closer than this to the plane are treated as parallel
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Straight-line propagation in either direction
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLinePropagator;

impl Propagator for StraightLinePropagator {
    fn propagate(&self, state: &TrajectoryState, surface: &Surface) -> TrajectoryState {
        if !state.is_valid() {
            return TrajectoryState::invalid();
        }
        let momentum = state.global_momentum();
        let along = momentum.dot(&surface.normal);
        if along.abs() < PARALLEL_TOLERANCE {
            return TrajectoryState::invalid();
        }
        let position = state.global_position();
        let step = -surface.signed_distance(&position) / along;
        TrajectoryState::new(
            position + momentum * step,
            momentum,
            state.charge(),
            Some(surface.id),
        )
    }
}

/// Geometry without magnetic field.
///
/// Track states are taken directly from the stored track parameters.
#[derive(Default)]
pub struct FieldFreeGeometry {
    surfaces: HashMap<DetId, Surface>,
    propagators: HashMap<String, Box<dyn Propagator>>,
}

impl FieldFreeGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector surface
    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.insert(surface.id, surface);
    }

    /// Register a propagator under `name`
    pub fn add_propagator(&mut self, name: impl Into<String>, propagator: Box<dyn Propagator>) {
        self.propagators.insert(name.into(), propagator);
    }

    /// Builder-style [`FieldFreeGeometry::add_propagator`]
    pub fn with_propagator(
        mut self,
        name: impl Into<String>,
        propagator: Box<dyn Propagator>,
    ) -> Self {
        self.add_propagator(name, propagator);
        self
    }

    fn state_from(parameters: &TrackParameters) -> TrajectoryState {
        TrajectoryState::new(
            parameters.position,
            parameters.momentum,
            parameters.charge,
            Some(parameters.surface),
        )
    }
}

impl GeometryService for FieldFreeGeometry {
    fn inner_state(&self, track: &RecoTrack) -> TrajectoryState {
        Self::state_from(track.inner_parameters())
    }

    fn outer_state(&self, track: &RecoTrack) -> TrajectoryState {
        Self::state_from(track.outer_parameters())
    }

    fn surface(&self, id: DetId) -> Option<Surface> {
        self.surfaces.get(&id).cloned()
    }

    fn propagator(&self, name: &str) -> Option<&dyn Propagator> {
        self.propagators.get(name).map(|p| p.as_ref())
    }
}

/// Hit builder measuring the raw global position
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleHitBuilder;

impl SimpleHitBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl HitBuilder for SimpleHitBuilder {
    fn build(&self, raw: &RawHit) -> HitRef {
        if raw.is_valid() {
            Hit::from_position(raw.det_id(), raw.position()).into_ref()
        } else {
            Hit::invalid(raw.det_id()).into_ref()
        }
    }
}

/// Tracker-track collections keyed by label
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvent {
    collections: HashMap<String, Vec<RecoTrack>>,
}

impl InMemoryEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a collection under `label`
    pub fn insert(&mut self, label: impl Into<String>, tracks: Vec<RecoTrack>) {
        self.collections.insert(label.into(), tracks);
    }

    /// Builder-style [`InMemoryEvent::insert`]
    pub fn with_collection(mut self, label: impl Into<String>, tracks: Vec<RecoTrack>) -> Self {
        self.insert(label, tracks);
        self
    }
}

impl EventSource for InMemoryEvent {
    fn tracker_tracks(&self, label: &str) -> TrackHandle<'_> {
        match self.collections.get(label) {
            Some(tracks) => TrackHandle::valid(tracks),
            None => TrackHandle::invalid(),
        }
    }
}

/// Hit builders keyed by name
#[derive(Default)]
pub struct HitBuilderMap {
    builders: HashMap<String, Box<dyn HitBuilder>>,
}

impl HitBuilderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builder under `name`
    pub fn insert(&mut self, name: impl Into<String>, builder: Box<dyn HitBuilder>) {
        self.builders.insert(name.into(), builder);
    }

    /// Builder-style [`HitBuilderMap::insert`]
    pub fn with_builder(mut self, name: impl Into<String>, builder: Box<dyn HitBuilder>) -> Self {
        self.insert(name, builder);
        self
    }
}

impl HitBuilderRecord for HitBuilderMap {
    fn hit_builder(&self, name: &str) -> Option<&dyn HitBuilder> {
        self.builders.get(name).map(|b| b.as_ref())
    }
}
