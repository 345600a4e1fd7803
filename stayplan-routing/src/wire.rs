//! Response types for the routing services.
//!
//! The open routing service (OSRM Route API) and the commercial directions
//! API share one response shape when asked for GeoJSON geometry, so a single
//! [`RouteResponse`] serves both. The two-point proxy answers with its own
//! flat [`ProxyResponse`].
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// Route API response.
///
/// The response carries a list of alternative routes on success or an error
/// message on failure. The `code` field indicates the response status.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoRoute"` - No route found between the coordinates
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes; the first one is used.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route in a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct RouteEntry {
    /// GeoJSON line string of the full route.
    pub geometry: LineString,
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// GeoJSON line string; coordinates are `[lon, lat]`.
#[derive(Debug, Default, Deserialize)]
pub struct LineString {
    /// Ordered `[lon, lat]` positions.
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// Two-point proxy response.
#[derive(Debug, Deserialize)]
pub struct ProxyResponse {
    /// Whether the proxy computed a route.
    #[serde(default)]
    pub ok: bool,
    /// Route length in kilometres.
    pub km: Option<f64>,
    /// Route duration in minutes.
    pub minutes: Option<f64>,
    /// Route geometry, when requested and available.
    pub geometry: Option<LineString>,
    /// Error message when `ok` is false.
    pub error: Option<String>,
}
