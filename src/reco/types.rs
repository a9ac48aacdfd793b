//! Track, hit and trajectory types
//!
//! This module defines the data model shared by every stage of the global
//! cosmic muon builder: raw detector hits and reconstructed tracks (owned by
//! the event), precise hits and trajectories (owned by the builder), and the
//! candidate types passed between stages.
//!
//! Coordinates follow the detector convention: the beam axis is `z` and the
//! vertical direction is `y`.

use std::rc::Rc;

use nalgebra::{DMatrix, DVector, Point3, Vector3};

/// Detector subsystem a hit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubDetector {
    /// Inner silicon tracker
    Tracker,
    /// Outer muon system
    Muon,
}

impl SubDetector {
    /// Short label used in hit dumps
    pub fn label(&self) -> &'static str {
        match self {
            SubDetector::Tracker => "Tk",
            SubDetector::Muon => "Mu",
        }
    }
}

/// Detector element identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetId {
    /// Subsystem owning the element
    pub det: SubDetector,
    /// Element index within the subsystem
    pub index: u32,
}

impl DetId {
    /// Create a new detector id
    pub fn new(det: SubDetector, index: u32) -> Self {
        Self { det, index }
    }

    /// Tracker element
    pub fn tracker(index: u32) -> Self {
        Self::new(SubDetector::Tracker, index)
    }

    /// Muon element
    pub fn muon(index: u32) -> Self {
        Self::new(SubDetector::Muon, index)
    }
}

/// Planar detector surface
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Element this surface belongs to
    pub id: DetId,
    /// A point on the plane
    pub origin: Point3<f64>,
    /// Unit normal of the plane
    pub normal: Vector3<f64>,
}

impl Surface {
    /// Create a surface; the normal is normalized
    pub fn new(id: DetId, origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            id,
            origin,
            normal: normal.normalize(),
        }
    }

    /// Horizontal plane (normal along `y`) at the given height
    pub fn horizontal(id: DetId, y: f64) -> Self {
        Self::new(id, Point3::new(0.0, y, 0.0), Vector3::y())
    }

    /// Signed distance of a point from the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }
}

/// Trajectory state on a surface: position, momentum and charge.
///
/// A state is either valid or the invalid sentinel returned by failed
/// propagations and unavailable surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryState {
    position: Point3<f64>,
    momentum: Vector3<f64>,
    charge: i8,
    surface: Option<DetId>,
    valid: bool,
}

impl TrajectoryState {
    /// Create a valid state
    pub fn new(
        position: Point3<f64>,
        momentum: Vector3<f64>,
        charge: i8,
        surface: Option<DetId>,
    ) -> Self {
        Self {
            position,
            momentum,
            charge,
            surface,
            valid: true,
        }
    }

    /// The invalid state
    pub fn invalid() -> Self {
        Self {
            position: Point3::origin(),
            momentum: Vector3::zeros(),
            charge: 0,
            surface: None,
            valid: false,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn global_position(&self) -> Point3<f64> {
        self.position
    }

    #[inline]
    pub fn global_momentum(&self) -> Vector3<f64> {
        self.momentum
    }

    #[inline]
    pub fn charge(&self) -> i8 {
        self.charge
    }

    /// Surface the state lives on (None for free states)
    #[inline]
    pub fn surface(&self) -> Option<DetId> {
        self.surface
    }

    /// Vertical position used to rank starting states.
    ///
    /// Invalid states rank below every valid one.
    #[inline]
    pub fn height(&self) -> f64 {
        if self.valid {
            self.position.y
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Raw detector hit as stored on a reconstructed track
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    det_id: DetId,
    position: Point3<f64>,
    valid: bool,
}

impl RawHit {
    /// Create a valid raw hit
    pub fn new(det_id: DetId, position: Point3<f64>) -> Self {
        Self {
            det_id,
            position,
            valid: true,
        }
    }

    /// Create an invalid (missing) raw hit on an element
    pub fn invalid(det_id: DetId) -> Self {
        Self {
            det_id,
            position: Point3::origin(),
            valid: false,
        }
    }

    #[inline]
    pub fn det_id(&self) -> DetId {
        self.det_id
    }

    #[inline]
    pub fn subdetector(&self) -> SubDetector {
        self.det_id.det
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }
}

/// Precise hit measurement.
///
/// Hits are immutable once built. Refining a hit at a trajectory state
/// produces a new hit; the original is left untouched. Invalid hits keep
/// the origin as their position.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    det_id: DetId,
    position: Point3<f64>,
    valid: bool,
    /// Local measurement parameters
    parameters: DVector<f64>,
    /// Covariance of the local parameters
    error: DMatrix<f64>,
    /// Track direction the hit was refined with, if any
    direction: Option<Vector3<f64>>,
}

/// Shared handle to an immutable hit
pub type HitRef = Rc<Hit>;

/// Ordered hit sequence; element order is traversal order
pub type HitSequence = Vec<HitRef>;

impl Hit {
    /// Create a valid hit with explicit local parameters
    pub fn new(
        det_id: DetId,
        position: Point3<f64>,
        parameters: DVector<f64>,
        error: DMatrix<f64>,
    ) -> Self {
        Self {
            det_id,
            position,
            valid: true,
            parameters,
            error,
            direction: None,
        }
    }

    /// Valid hit measuring its global position with unit covariance
    pub fn from_position(det_id: DetId, position: Point3<f64>) -> Self {
        Self::new(
            det_id,
            position,
            DVector::from_column_slice(position.coords.as_slice()),
            DMatrix::identity(3, 3),
        )
    }

    /// Invalid hit on an element
    pub fn invalid(det_id: DetId) -> Self {
        Self {
            det_id,
            position: Point3::origin(),
            valid: false,
            parameters: DVector::zeros(0),
            error: DMatrix::zeros(0, 0),
            direction: None,
        }
    }

    /// Copy of this hit refined with the given track direction
    pub fn refined(&self, direction: Vector3<f64>) -> Self {
        Self {
            direction: Some(direction),
            ..self.clone()
        }
    }

    #[inline]
    pub fn det_id(&self) -> DetId {
        self.det_id
    }

    #[inline]
    pub fn subdetector(&self) -> SubDetector {
        self.det_id.det
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn global_position(&self) -> Point3<f64> {
        self.position
    }

    pub fn parameters(&self) -> &DVector<f64> {
        &self.parameters
    }

    pub fn error(&self) -> &DMatrix<f64> {
        &self.error
    }

    /// Direction used to refine the hit (None for unrefined hits)
    pub fn direction(&self) -> Option<&Vector3<f64>> {
        self.direction.as_ref()
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> HitRef {
        Rc::new(self)
    }
}

/// Fitted track parameters at a reference surface
#[derive(Debug, Clone, PartialEq)]
pub struct TrackParameters {
    /// Reference position
    pub position: Point3<f64>,
    /// Momentum at the reference position
    pub momentum: Vector3<f64>,
    /// Electric charge in units of e
    pub charge: i8,
    /// Element of the reference surface
    pub surface: DetId,
}

impl TrackParameters {
    pub fn new(position: Point3<f64>, momentum: Vector3<f64>, charge: i8, surface: DetId) -> Self {
        Self {
            position,
            momentum,
            charge,
            surface,
        }
    }
}

/// Reconstructed track owned by the event.
///
/// Holds the raw hits in detector-native order and the fitted parameters at
/// the innermost and outermost hit surfaces. The builder only reads tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoTrack {
    hits: Vec<RawHit>,
    inner: TrackParameters,
    outer: TrackParameters,
}

impl RecoTrack {
    pub fn new(hits: Vec<RawHit>, inner: TrackParameters, outer: TrackParameters) -> Self {
        Self { hits, inner, outer }
    }

    /// Raw hits in stored order
    pub fn rec_hits(&self) -> &[RawHit] {
        &self.hits
    }

    /// Number of valid raw hits
    pub fn found(&self) -> usize {
        self.hits.iter().filter(|h| h.is_valid()).count()
    }

    /// Parameters at the innermost hit surface
    pub fn inner_parameters(&self) -> &TrackParameters {
        &self.inner
    }

    /// Parameters at the outermost hit surface
    pub fn outer_parameters(&self) -> &TrackParameters {
        &self.outer
    }
}

/// Hit together with the fitted state at that hit
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryMeasurement {
    hit: HitRef,
    updated_state: TrajectoryState,
}

impl TrajectoryMeasurement {
    pub fn new(hit: HitRef, updated_state: TrajectoryState) -> Self {
        Self { hit, updated_state }
    }

    pub fn rec_hit(&self) -> &HitRef {
        &self.hit
    }

    pub fn updated_state(&self) -> &TrajectoryState {
        &self.updated_state
    }
}

/// Fitted trajectory: ordered measurements
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    measurements: Vec<TrajectoryMeasurement>,
    valid: bool,
}

impl Trajectory {
    /// Create an empty valid trajectory
    pub fn new() -> Self {
        Self {
            measurements: Vec::new(),
            valid: true,
        }
    }

    /// Create a trajectory from measurements
    pub fn from_measurements(measurements: Vec<TrajectoryMeasurement>) -> Self {
        Self {
            measurements,
            valid: true,
        }
    }

    /// Mark the trajectory as unusable
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn measurements(&self) -> &[TrajectoryMeasurement] {
        &self.measurements
    }

    /// Number of fitted measurements
    #[inline]
    pub fn num_measurements(&self) -> usize {
        self.measurements.len()
    }

    /// Hits of all measurements, in trajectory order
    pub fn rec_hits(&self) -> HitSequence {
        self.measurements.iter().map(|m| Rc::clone(&m.hit)).collect()
    }

    pub fn first_measurement(&self) -> Option<&TrajectoryMeasurement> {
        self.measurements.first()
    }

    pub fn last_measurement(&self) -> Option<&TrajectoryMeasurement> {
        self.measurements.last()
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed handed to the refitter.
///
/// The global builder always passes an empty seed; the starting state carries
/// the initial parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectorySeed {
    hits: HitSequence,
}

impl TrajectorySeed {
    /// Seed without hits
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> &[HitRef] {
        &self.hits
    }
}

/// Candidate pair: optional precomputed trajectory plus a track reference.
///
/// Either part may be missing. A missing or invalid trajectory means the
/// hits have to be re-derived from the track.
#[derive(Debug, Clone, Copy)]
pub struct TrackCand<'a> {
    trajectory: Option<&'a Trajectory>,
    track: Option<&'a RecoTrack>,
}

impl<'a> TrackCand<'a> {
    pub fn new(trajectory: Option<&'a Trajectory>, track: Option<&'a RecoTrack>) -> Self {
        Self { trajectory, track }
    }

    /// Pair without a precomputed trajectory
    pub fn from_track(track: &'a RecoTrack) -> Self {
        Self::new(None, Some(track))
    }

    pub fn trajectory(&self) -> Option<&'a Trajectory> {
        self.trajectory
    }

    pub fn track(&self) -> Option<&'a RecoTrack> {
        self.track
    }

    /// The precomputed trajectory, if present and valid
    pub fn usable_trajectory(&self) -> Option<&'a Trajectory> {
        self.trajectory.filter(|t| t.is_valid())
    }
}

/// Reconstructed global cosmic muon.
///
/// Owns the fitted trajectory and refers to the two tracks it was built from.
#[derive(Debug, Clone)]
pub struct MuonCandidate<'a> {
    trajectory: Trajectory,
    muon_track: &'a RecoTrack,
    tracker_track: &'a RecoTrack,
}

impl<'a> MuonCandidate<'a> {
    pub fn new(
        trajectory: Trajectory,
        muon_track: &'a RecoTrack,
        tracker_track: &'a RecoTrack,
    ) -> Self {
        Self {
            trajectory,
            muon_track,
            tracker_track,
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn muon_track(&self) -> &'a RecoTrack {
        self.muon_track
    }

    pub fn tracker_track(&self) -> &'a RecoTrack {
        self.tracker_track
    }

    /// Consume the candidate, keeping the trajectory
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

/// Track-matching metric, with the matcher's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMetric {
    /// Chi-squared compatibility (code 0)
    Chi2,
    /// Spatial distance (code 1)
    Distance,
    /// Position ratio (code 2)
    PositionRatio,
}

impl MatchMetric {
    pub fn code(&self) -> u8 {
        match self {
            MatchMetric::Chi2 => 0,
            MatchMetric::Distance => 1,
            MatchMetric::PositionRatio => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MatchMetric::Chi2),
            1 => Some(MatchMetric::Distance),
            2 => Some(MatchMetric::PositionRatio),
            _ => None,
        }
    }

    /// All metrics in code order
    pub const ALL: [MatchMetric; 3] = [
        MatchMetric::Chi2,
        MatchMetric::Distance,
        MatchMetric::PositionRatio,
    ];
}

/// Surface at which a match is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceOption {
    /// Innermost muon hit surface (code 0)
    InnermostMuonSurface,
    /// Outermost tracker hit surface (code 1)
    OutermostTrackerSurface,
}

impl SurfaceOption {
    pub fn code(&self) -> u8 {
        match self {
            SurfaceOption::InnermostMuonSurface => 0,
            SurfaceOption::OutermostTrackerSurface => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SurfaceOption::InnermostMuonSurface),
            1 => Some(SurfaceOption::OutermostTrackerSurface),
            _ => None,
        }
    }
}

/// Diagnostic scores of one muon/tracker pairing under every metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScores {
    /// Chi-squared compatibility
    pub chi2: f64,
    /// Spatial distance
    pub distance: f64,
    /// Position ratio
    pub position_ratio: f64,
}

impl PairScores {
    /// Score under `metric`
    pub fn get(&self, metric: MatchMetric) -> f64 {
        match metric {
            MatchMetric::Chi2 => self.chi2,
            MatchMetric::Distance => self.distance,
            MatchMetric::PositionRatio => self.position_ratio,
        }
    }
}
