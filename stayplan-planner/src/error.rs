//! Error types for planner configuration.

use stayplan_scorer::WeightsError;
use thiserror::Error;

/// Errors raised by [`PlannerConfig::validate`](crate::PlannerConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerConfigError {
    /// The grouping distance threshold was not a positive, finite number.
    #[error("distance threshold must be a positive number of kilometres, got {0}")]
    InvalidDistanceThreshold(f64),
    /// Groups must be allowed at least one member.
    #[error("maximum group size must be at least 1")]
    ZeroGroupSize,
    /// The final stop rating threshold fell outside the rating scale.
    #[error("final stop minimum rating must lie in [0, 10], got {0}")]
    InvalidFinalStopRating(f64),
    /// The hub score weights were rejected.
    #[error("invalid hub score weights: {0}")]
    Weights(#[from] WeightsError),
}
