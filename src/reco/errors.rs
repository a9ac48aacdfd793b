//! Error types for the global cosmic muon builder
//!
//! Reconstruction never fails loudly: every [`RejectReason`] ends the
//! current attempt with an empty candidate set. [`ConfigError`] covers
//! loading and validating the builder configuration.

use std::fmt;

/// Why a reconstruction attempt produced no candidate
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Absent, invalid or empty inputs, or a null track reference
    MissingInput {
        /// What was missing
        context: String,
    },

    /// A hit sequence lacks two distinct valid endpoints
    GeometricDegeneracy {
        /// Which sequence was degenerate
        context: String,
    },

    /// No acceptable tracker match or no valid starting state
    NoMatch {
        /// Which stage found nothing
        context: String,
    },

    /// Neither the refit nor the fallback fit produced a trajectory
    FitFailure,

    /// Fitted trajectory does not have more measurements than the tracker track has hits
    InsufficientResult {
        /// Measurements in the fitted trajectory
        measurements: usize,
        /// Valid hits on the tracker track
        tracker_hits: usize,
    },
}

impl RejectReason {
    pub(crate) fn missing(context: impl Into<String>) -> Self {
        RejectReason::MissingInput {
            context: context.into(),
        }
    }

    pub(crate) fn degenerate(context: impl Into<String>) -> Self {
        RejectReason::GeometricDegeneracy {
            context: context.into(),
        }
    }

    pub(crate) fn no_match(context: impl Into<String>) -> Self {
        RejectReason::NoMatch {
            context: context.into(),
        }
    }

    /// Short machine-friendly name of the rejection kind
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::MissingInput { .. } => "missing-input",
            RejectReason::GeometricDegeneracy { .. } => "geometric-degeneracy",
            RejectReason::NoMatch { .. } => "no-match",
            RejectReason::FitFailure => "fit-failure",
            RejectReason::InsufficientResult { .. } => "insufficient-result",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingInput { context } => write!(f, "Missing input: {}", context),
            RejectReason::GeometricDegeneracy { context } => {
                write!(f, "Degenerate hit sequence: {}", context)
            }
            RejectReason::NoMatch { context } => write!(f, "No match: {}", context),
            RejectReason::FitFailure => write!(f, "Refit failed"),
            RejectReason::InsufficientResult {
                measurements,
                tracker_hits,
            } => write!(
                f,
                "Insufficient measurements: {} fitted, tracker track has {} hits",
                measurements, tracker_hits
            ),
        }
    }
}

impl std::error::Error for RejectReason {}

/// Errors raised while loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    /// A required name or label is empty
    EmptyField {
        /// Field name
        field: &'static str,
    },

    /// JSON could not be parsed into a configuration
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyField { field } => {
                write!(f, "Configuration error: '{}' must not be empty", field)
            }
            ConfigError::Parse(e) => write!(f, "Configuration parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
