//! Routed legs between waypoints.
//!
//! A [`RouteLeg`] is the unit returned by every routing provider: a polyline,
//! its total distance and duration, and a provenance tag telling callers
//! whether the geometry came from a real router or a geometric estimate.

use geo::Coord;

use crate::geometry::haversine_km;

/// Whether a route came from a routing service or was approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Provenance {
    /// Geometry and totals were produced by a routing service.
    Routed,
    /// Geometry is a straight-line interpolation; totals are estimates.
    Approximated,
}

/// Which provider produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RouteSource {
    /// The open routing service (OSRM API).
    OpenRouting,
    /// The commercial directions API.
    Directions,
    /// The two-point routing proxy.
    Proxy,
    /// Straight-line interpolation between waypoints.
    StraightLine,
}

impl RouteSource {
    /// Provenance implied by the source.
    #[must_use]
    pub const fn provenance(self) -> Provenance {
        match self {
            Self::StraightLine => Provenance::Approximated,
            Self::OpenRouting | Self::Directions | Self::Proxy => Provenance::Routed,
        }
    }
}

/// A computed route through an ordered set of coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::{Provenance, RouteLeg, RouteSource};
///
/// let leg = RouteLeg::new(
///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 }],
///     111_000.0,
///     4_000.0,
///     RouteSource::OpenRouting,
/// );
/// assert_eq!(leg.provenance, Provenance::Routed);
/// assert!((leg.distance_km() - 111.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RouteLeg {
    /// Polyline in travel order.
    #[cfg_attr(feature = "serde", serde(with = "lat_lon_pairs"))]
    pub coordinates: Vec<Coord<f64>>,
    /// Total distance in metres.
    #[cfg_attr(feature = "serde", serde(rename = "distance"))]
    pub distance_m: f64,
    /// Total duration in seconds.
    #[cfg_attr(feature = "serde", serde(rename = "duration"))]
    pub duration_s: f64,
    /// Whether the leg was routed or approximated.
    pub provenance: Provenance,
    /// Provider that produced the leg.
    pub source: RouteSource,
}

impl RouteLeg {
    /// Construct a leg; provenance follows from `source`.
    #[must_use]
    pub fn new(
        coordinates: Vec<Coord<f64>>,
        distance_m: f64,
        duration_s: f64,
        source: RouteSource,
    ) -> Self {
        Self {
            coordinates,
            distance_m,
            duration_s,
            provenance: source.provenance(),
            source,
        }
    }

    /// Total distance in kilometres.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Report whether the leg came from a routing service.
    #[must_use]
    pub fn is_routed(&self) -> bool {
        self.provenance == Provenance::Routed
    }

    /// Cumulative great-circle distance in kilometres at each polyline point.
    ///
    /// The first entry is always zero. Map widgets use this to place progress
    /// markers along the line.
    #[must_use]
    pub fn cumulative_km(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut cumulative = Vec::with_capacity(self.coordinates.len());
        let mut previous: Option<Coord<f64>> = None;
        for point in &self.coordinates {
            if let Some(prev) = previous {
                total += haversine_km(prev, *point);
            }
            cumulative.push(total);
            previous = Some(*point);
        }
        cumulative
    }
}

/// Serialise coordinates as `[lat, lon]` pairs, the order map clients expect.
#[cfg(feature = "serde")]
mod lat_lon_pairs {
    use geo::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(coords: &[Coord<f64>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        coords
            .iter()
            .map(|coord| [coord.y, coord.x])
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Coord<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pairs
            .into_iter()
            .map(|[lat, lon]| Coord { x: lon, y: lat })
            .collect())
    }
}
