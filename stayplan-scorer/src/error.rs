//! Error types for hub scoring configuration.

use thiserror::Error;

/// Errors raised when validating [`HubScoreWeights`](crate::HubScoreWeights).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    /// A weight was negative or not finite.
    #[error("weight {name} must be a finite, non-negative number, got {value}")]
    InvalidWeight {
        /// Field name of the offending weight.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The default rating fell outside the waypoint rating scale.
    #[error("default rating must lie in [0, 10], got {0}")]
    InvalidDefaultRating(f64),
}
