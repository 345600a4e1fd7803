//! Planner configuration.

use serde::{Deserialize, Serialize};
use stayplan_scorer::HubScoreWeights;

use crate::error::PlannerConfigError;

/// Consecutive waypoints further apart than this start a new group.
pub const DEFAULT_DISTANCE_THRESHOLD_KM: f64 = 20.0;

/// Largest number of waypoints sharing one hub.
pub const DEFAULT_MAX_GROUP_SIZE: usize = 4;

/// Nights every eligible hub receives before proportional sharing.
pub const DEFAULT_MIN_NIGHTS_PER_HUB: u32 = 1;

/// Rating at or above which a hub ending the itinerary still gets nights.
pub const DEFAULT_FINAL_STOP_MIN_RATING: f64 = 5.0;

/// Tunable parameters for grouping and night allocation.
///
/// # Examples
///
/// ```
/// use stayplan_planner::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_distance_threshold_km(35.0)
///     .with_max_group_size(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Distance in kilometres beyond which consecutive stops are split.
    pub distance_threshold_km: f64,
    /// Upper bound on group membership.
    pub max_group_size: usize,
    /// Per-hub floor applied before the remainder is shared.
    pub min_nights_per_hub: u32,
    /// Rating threshold for a final-stop hub to receive nights.
    pub final_stop_min_rating: f64,
    /// Hub scoring weights.
    pub weights: HubScoreWeights,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            distance_threshold_km: DEFAULT_DISTANCE_THRESHOLD_KM,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            min_nights_per_hub: DEFAULT_MIN_NIGHTS_PER_HUB,
            final_stop_min_rating: DEFAULT_FINAL_STOP_MIN_RATING,
            weights: HubScoreWeights::default(),
        }
    }
}

impl PlannerConfig {
    /// Set the grouping distance threshold in kilometres.
    #[must_use]
    pub const fn with_distance_threshold_km(mut self, km: f64) -> Self {
        self.distance_threshold_km = km;
        self
    }

    /// Set the maximum group size.
    #[must_use]
    pub const fn with_max_group_size(mut self, size: usize) -> Self {
        self.max_group_size = size;
        self
    }

    /// Set the per-hub night floor.
    #[must_use]
    pub const fn with_min_nights_per_hub(mut self, nights: u32) -> Self {
        self.min_nights_per_hub = nights;
        self
    }

    /// Set the rating threshold for a final-stop hub.
    #[must_use]
    pub const fn with_final_stop_min_rating(mut self, rating: f64) -> Self {
        self.final_stop_min_rating = rating;
        self
    }

    /// Replace the hub scoring weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: HubScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check the configuration before planning.
    ///
    /// # Errors
    /// Returns [`PlannerConfigError`] for a non-positive distance threshold,
    /// a zero group size, a final-stop rating outside `[0, 10]`, or invalid
    /// scoring weights.
    pub fn validate(&self) -> Result<(), PlannerConfigError> {
        if !self.distance_threshold_km.is_finite() || self.distance_threshold_km <= 0.0 {
            return Err(PlannerConfigError::InvalidDistanceThreshold(
                self.distance_threshold_km,
            ));
        }
        if self.max_group_size == 0 {
            return Err(PlannerConfigError::ZeroGroupSize);
        }
        if !(0.0..=10.0).contains(&self.final_stop_min_rating) {
            return Err(PlannerConfigError::InvalidFinalStopRating(
                self.final_stop_min_rating,
            ));
        }
        self.weights.validate()?;
        Ok(())
    }
}
