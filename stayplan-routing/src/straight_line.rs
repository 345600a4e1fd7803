//! Terminal fallback: straight lines between waypoints.

use geo::Coord;
use stayplan_core::geometry::{interpolate, path_length_km};
use stayplan_core::{RouteLeg, RouteSource, TravelProfile};

/// Minimum number of sampled points across the whole route.
const MIN_SAMPLES: usize = 20;

/// Kilometres per additional sampled point on long routes.
const KM_PER_SAMPLE: f64 = 50.0;

/// Approximate a route by interpolating straight lines between `points`.
///
/// Distance is the great-circle sum; duration assumes the profile's average
/// speed. Samples are spread evenly over the legs, with at least two per leg,
/// and the final waypoint is always the last coordinate. Never fails: fewer
/// than two points yield a zero-length leg through whatever was supplied.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::{Provenance, TravelProfile};
/// use stayplan_routing::straight_line;
///
/// let leg = straight_line(
///     &[Coord { x: 2.35, y: 48.85 }, Coord { x: 4.84, y: 45.76 }],
///     TravelProfile::Driving,
/// );
/// assert_eq!(leg.provenance, Provenance::Approximated);
/// assert!(leg.coordinates.len() >= 20);
/// assert!(leg.distance_m > 0.0);
/// ```
#[must_use]
pub fn straight_line(points: &[Coord<f64>], profile: TravelProfile) -> RouteLeg {
    let total_km = path_length_km(points);
    let legs = points.len().saturating_sub(1);
    let coordinates = if legs == 0 {
        points.to_vec()
    } else {
        let per_leg = (sample_count(total_km) / legs).max(2);
        let mut coordinates = Vec::with_capacity(legs * per_leg + 1);
        for pair in points.windows(2) {
            if let [from, to] = pair {
                let mut segment = interpolate(*from, *to, per_leg);
                segment.pop();
                coordinates.extend(segment);
            }
        }
        coordinates.extend(points.last().copied());
        coordinates
    };

    RouteLeg::new(
        coordinates,
        total_km * 1000.0,
        total_km / profile.assumed_speed_kmh() * 3600.0,
        RouteSource::StraightLine,
    )
}

fn sample_count(total_km: f64) -> usize {
    let by_distance = (total_km / KM_PER_SAMPLE).ceil();
    MIN_SAMPLES.max(by_distance as usize)
}
