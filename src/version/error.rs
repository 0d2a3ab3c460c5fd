use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Version string is empty")]
    Empty,
}

/// A bound or range specification that does not parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid range specification '{spec}': {reason}")]
    InvalidSpecification { spec: String, reason: String },

    #[error("Invalid bound '{0}': version string is empty")]
    InvalidBound(String),

    #[error("Both versionRange and explicit bounds are set for {0}")]
    ConflictingRestriction(String),
}

impl RangeError {
    pub(crate) fn invalid(spec: &str, reason: impl Into<String>) -> Self {
        RangeError::InvalidSpecification {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of the metadata provider to produce a version list
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Component not found: {0}")]
    NotFound(String),

    #[error("Metadata unavailable for {coordinate}: {reason}")]
    Unavailable { coordinate: String, reason: String },

    #[error("Invalid metadata: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error from evaluating a single component
///
/// `Metadata` failures are local to one component and a batch skips them.
/// `Config` failures mean the configuration itself is broken.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EvaluationError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EvaluationError::Metadata(_))
    }
}
