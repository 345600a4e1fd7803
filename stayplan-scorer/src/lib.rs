//! Hub scoring for Stayplan itineraries.
//!
//! When consecutive waypoints are close enough to share one lodging base, the
//! planner asks this crate which member should host it. The score rewards a
//! high rating, a long suggested stay, many attached visits, and a central
//! position in the group, so that day trips from the hub stay short.
//!
//! Two views of the score are exposed:
//! - [`score_hub`] ranks members of one group and includes centrality.
//! - [`stay_weight`] omits centrality and is used to share nights between
//!   hubs of different groups, where position inside a group is meaningless.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use stayplan_core::Waypoint;
//! use stayplan_scorer::{HubScoreWeights, score_hub};
//!
//! let stop = Waypoint::new(1, "Annecy", Coord { x: 6.13, y: 45.90 })
//!     .unwrap()
//!     .with_rating(8.0)
//!     .unwrap();
//! let weights = HubScoreWeights::default();
//! // Singleton groups are fully central.
//! assert_eq!(score_hub(&stop, 1, 0, &weights), 80.0 + 15.0 + 20.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod weights;

pub use error::WeightsError;
pub use weights::HubScoreWeights;

use stayplan_core::Waypoint;

/// Centrality of `position` in a group of `group_size` members, in `[0, 1]`.
///
/// The middle of the group scores 1 and the ends score 0 (groups of three or
/// more); pairs score 0.5 for both members and singletons score 1. Positions
/// outside the group are clamped to 0.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "centrality is a ratio over small group indices"
)]
#[must_use]
pub fn centrality(group_size: usize, position: usize) -> f64 {
    if group_size == 0 {
        return 0.0;
    }
    let centre = (group_size - 1) as f64 / 2.0;
    let offset = (position as f64 - centre).abs();
    (1.0 - offset / centre.max(1.0)).max(0.0)
}

/// Score of `waypoint` without the centrality term.
///
/// This is the weight used when distributing nights across hubs.
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted sums of waypoint attributes"
)]
#[must_use]
pub fn stay_weight(waypoint: &Waypoint, weights: &HubScoreWeights) -> f64 {
    let rating = waypoint.rating.unwrap_or(weights.default_rating);
    let days = waypoint
        .suggested_days
        .unwrap_or(weights.default_suggested_days);
    let pois = waypoint.poi_count.min(weights.poi_cap);

    rating * weights.rating + f64::from(days) * weights.suggested_days + f64::from(pois) * weights.poi
}

/// Score `waypoint` as hub candidate at `position` within a group of
/// `group_size` consecutive waypoints.
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted sums of waypoint attributes"
)]
#[must_use]
pub fn score_hub(
    waypoint: &Waypoint,
    group_size: usize,
    position: usize,
    weights: &HubScoreWeights,
) -> f64 {
    let score =
        stay_weight(waypoint, weights) + centrality(group_size, position) * weights.centrality;
    log::trace!(
        "hub score for waypoint {} at {position}/{group_size}: {score:.2}",
        waypoint.id
    );
    score
}
