//! Great-circle geometry on WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is
//! latitude, both in degrees. Distances are returned in kilometres.

use geo::Coord;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::geometry::haversine_km;
///
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let lyon = Coord { x: 4.8357, y: 45.7640 };
/// let km = haversine_km(paris, lyon);
/// assert!((390.0..400.0).contains(&km));
/// ```
#[must_use]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of great-circle distances along consecutive points, in kilometres.
#[must_use]
pub fn path_length_km(points: &[Coord<f64>]) -> f64 {
    points
        .windows(2)
        .map(|pair| match pair {
            [from, to] => haversine_km(*from, *to),
            _ => 0.0,
        })
        .sum()
}

/// Linearly interpolate `segments + 1` points from `from` to `to` inclusive.
///
/// Interpolation happens in coordinate space, which is adequate for drawing a
/// placeholder line between two nearby stops. A `segments` value of zero is
/// treated as one.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::geometry::interpolate;
///
/// let points = interpolate(Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 4.0 }, 2);
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[1], Coord { x: 1.0, y: 2.0 });
/// ```
#[must_use]
pub fn interpolate(from: Coord<f64>, to: Coord<f64>, segments: usize) -> Vec<Coord<f64>> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|step| {
            let t = step as f64 / segments as f64;
            Coord {
                x: from.x + t * (to.x - from.x),
                y: from.y + t * (to.y - from.y),
            }
        })
        .collect()
}
