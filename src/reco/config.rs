//! Builder configuration
//!
//! The configuration is fixed when the builder is constructed. Collaborator
//! parameter groups (smoother, track matcher) are opaque key/value maps that
//! the builder hands through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Opaque parameter group passed through to a collaborator
pub type ParameterSet = BTreeMap<String, serde_json::Value>;

/// Default tracker-track collection label
pub const DEFAULT_TRACKER_TRACK_LABEL: &str = "ctfWithMaterialTracksP5";
/// Default tracker hit builder
pub const DEFAULT_TRACKER_HIT_BUILDER: &str = "WithTrackAngle";
/// Default muon hit builder
pub const DEFAULT_MUON_HIT_BUILDER: &str = "MuonRecHitBuilder";
/// Default propagator used when re-deriving hits
pub const DEFAULT_PROPAGATOR: &str = "SteppingHelixPropagatorAny";

/// Configuration of the global cosmic muon builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Label of the tracker-track collection in the event
    pub tracker_track_label: String,
    /// Name of the tracker hit builder
    pub tracker_hit_builder: String,
    /// Name of the muon hit builder
    pub muon_hit_builder: String,
    /// Name of the propagator used by the hit materializer
    pub propagator: String,
    /// Parameters for the smoother/refitter
    pub smoother_parameters: ParameterSet,
    /// Parameters for the track matcher
    pub matcher_parameters: ParameterSet,
    /// Score every tracker pairing under all metrics for diagnostics
    pub diagnostic_scores: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            tracker_track_label: DEFAULT_TRACKER_TRACK_LABEL.to_string(),
            tracker_hit_builder: DEFAULT_TRACKER_HIT_BUILDER.to_string(),
            muon_hit_builder: DEFAULT_MUON_HIT_BUILDER.to_string(),
            propagator: DEFAULT_PROPAGATOR.to_string(),
            smoother_parameters: ParameterSet::new(),
            matcher_parameters: ParameterSet::new(),
            diagnostic_scores: false,
        }
    }
}

impl BuilderConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tracker-track collection label
    pub fn with_tracker_track_label(mut self, label: impl Into<String>) -> Self {
        self.tracker_track_label = label.into();
        self
    }

    /// Set the tracker and muon hit builder names
    pub fn with_hit_builders(
        mut self,
        tracker: impl Into<String>,
        muon: impl Into<String>,
    ) -> Self {
        self.tracker_hit_builder = tracker.into();
        self.muon_hit_builder = muon.into();
        self
    }

    /// Set the propagator name
    pub fn with_propagator(mut self, name: impl Into<String>) -> Self {
        self.propagator = name.into();
        self
    }

    /// Set the smoother parameter group
    pub fn with_smoother_parameters(mut self, parameters: ParameterSet) -> Self {
        self.smoother_parameters = parameters;
        self
    }

    /// Set the track matcher parameter group
    pub fn with_matcher_parameters(mut self, parameters: ParameterSet) -> Self {
        self.matcher_parameters = parameters;
        self
    }

    /// Enable or disable per-pairing diagnostic scores
    pub fn with_diagnostic_scores(mut self, enabled: bool) -> Self {
        self.diagnostic_scores = enabled;
        self
    }

    /// Check that every name and label is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("tracker_track_label", &self.tracker_track_label),
            ("tracker_hit_builder", &self.tracker_hit_builder),
            ("muon_hit_builder", &self.muon_hit_builder),
            ("propagator", &self.propagator),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Snapshot for debugging output
    pub fn snapshot(&self) -> BuilderConfigSnapshot {
        self.into()
    }
}

/// Flat summary of a configuration for logs and comparisons.
#[derive(Debug, Clone, Serialize)]
pub struct BuilderConfigSnapshot {
    /// Builder type identifier
    pub builder_type: String,
    /// Tracker-track collection label
    pub tracker_track_label: String,
    /// Hit builder names (tracker, muon)
    pub hit_builders: (String, String),
    /// Propagator name
    pub propagator: String,
    /// Keys of the smoother parameter group
    pub smoother_keys: Vec<String>,
    /// Keys of the matcher parameter group
    pub matcher_keys: Vec<String>,
    /// Whether diagnostic scores are computed
    pub diagnostic_scores: bool,
}

impl From<&BuilderConfig> for BuilderConfigSnapshot {
    fn from(c: &BuilderConfig) -> Self {
        Self {
            builder_type: "GlobalCosmicMuonTrajectoryBuilder".to_string(),
            tracker_track_label: c.tracker_track_label.clone(),
            hit_builders: (c.tracker_hit_builder.clone(), c.muon_hit_builder.clone()),
            propagator: c.propagator.clone(),
            smoother_keys: c.smoother_parameters.keys().cloned().collect(),
            matcher_keys: c.matcher_parameters.keys().cloned().collect(),
            diagnostic_scores: c.diagnostic_scores,
        }
    }
}

impl BuilderConfigSnapshot {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
