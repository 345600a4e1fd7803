//! Tunable hub scoring weights.

use serde::{Deserialize, Serialize};

use crate::error::WeightsError;

/// Weights applied to the hub score terms.
///
/// The score of a waypoint `w` at `position` in a group of `size` members is
///
/// ```text
/// rating(w) * rating + suggested_days(w) * suggested_days
///     + centrality(size, position) * centrality
///     + min(poi_count(w), poi_cap) * poi
/// ```
///
/// Missing ratings count as [`default_rating`](Self::default_rating) and
/// missing stay hints as [`default_suggested_days`](Self::default_suggested_days).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HubScoreWeights {
    /// Multiplier applied to the 0-10 rating.
    pub rating: f64,
    /// Multiplier applied to the suggested stay in days.
    pub suggested_days: f64,
    /// Multiplier applied to the 0-1 centrality within the group.
    pub centrality: f64,
    /// Multiplier applied to each attached visit or activity.
    pub poi: f64,
    /// Attached visits and activities beyond this count are ignored.
    pub poi_cap: u32,
    /// Rating assumed when a waypoint has none.
    pub default_rating: f64,
    /// Stay hint assumed when a waypoint has none.
    pub default_suggested_days: u32,
}

impl Default for HubScoreWeights {
    fn default() -> Self {
        Self {
            rating: 10.0,
            suggested_days: 15.0,
            centrality: 20.0,
            poi: 2.0,
            poi_cap: 10,
            default_rating: 5.0,
            default_suggested_days: 1,
        }
    }
}

impl HubScoreWeights {
    /// Check that every multiplier is finite and non-negative.
    ///
    /// # Errors
    /// Returns [`WeightsError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), WeightsError> {
        let multipliers = [
            ("rating", self.rating),
            ("suggestedDays", self.suggested_days),
            ("centrality", self.centrality),
            ("poi", self.poi),
        ];
        if let Some((name, value)) = multipliers
            .into_iter()
            .find(|(_, value)| !value.is_finite() || value.is_sign_negative())
        {
            return Err(WeightsError::InvalidWeight { name, value });
        }
        if !(0.0..=10.0).contains(&self.default_rating) {
            return Err(WeightsError::InvalidDefaultRating(self.default_rating));
        }
        Ok(())
    }

    /// Set the rating multiplier.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Set the centrality multiplier.
    #[must_use]
    pub const fn with_centrality(mut self, centrality: f64) -> Self {
        self.centrality = centrality;
        self
    }
}
