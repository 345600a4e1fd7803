//! Deterministic helpers shared by unit and behaviour tests.

use async_trait::async_trait;
use geo::Coord;

use crate::geometry::path_length_km;
use crate::{RouteLeg, RouteProvider, RouteSource, RoutingError, TravelProfile, Waypoint};

/// Build a waypoint at `(lon, lat)` with a generated name.
///
/// # Panics
/// Panics when the coordinates are out of range; test inputs are fixed.
#[must_use]
pub fn waypoint_at(id: u64, lon: f64, lat: f64) -> Waypoint {
    Waypoint::new(id, format!("Stop {id}"), Coord { x: lon, y: lat })
        .expect("test waypoint coordinates are valid")
}

/// Provider that echoes the input polyline and reports great-circle totals.
///
/// Durations assume the profile's average speed. The leg is tagged with the
/// configured source, so the provider can stand in for any real service.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleProvider {
    source: RouteSource,
}

impl GreatCircleProvider {
    /// Tag produced legs with `source`.
    #[must_use]
    pub const fn with_source(source: RouteSource) -> Self {
        Self { source }
    }
}

impl Default for GreatCircleProvider {
    fn default() -> Self {
        Self::with_source(RouteSource::OpenRouting)
    }
}

#[async_trait]
impl RouteProvider for GreatCircleProvider {
    fn name(&self) -> &'static str {
        "great-circle"
    }

    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InsufficientInput);
        }
        let km = path_length_km(points);
        Ok(RouteLeg::new(
            points.to_vec(),
            km * 1000.0,
            km / profile.assumed_speed_kmh() * 3600.0,
            self.source,
        ))
    }
}
