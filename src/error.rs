//! Unified error type for the checked entry points.
//!
//! The simplification core itself is total: empty input, coincident points and
//! missing timestamps all have defined results. Errors only arise when a caller
//! asks for validation of a configuration or of untrusted points.

use thiserror::Error;

/// Errors returned by configuration and point validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
    /// A configuration field holds a value the pipeline cannot work with.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A point has non-finite or out-of-range coordinates.
    #[error("invalid point at index {index}: ({latitude}, {longitude})")]
    InvalidPoint {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
}

impl SimplifyError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        SimplifyError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimplifyError>;
