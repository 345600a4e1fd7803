//! HTTP `RouteProvider` for OSRM-compatible route services.
//!
//! [`HttpRouteProvider`] speaks to two service families that share a response
//! shape: the open routing service (OSRM Route API, no credentials) and the
//! commercial directions API (access token, 25-coordinate cap). The flavour
//! is chosen by [`HttpRouteProviderConfig`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use stayplan_core::{RouteProvider, TravelProfile};
//! use stayplan_routing::{HttpRouteProvider, HttpRouteProviderConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRouteProviderConfig::open_routing("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(5));
//! let provider = HttpRouteProvider::with_config(config)?;
//! let points = [Coord { x: 2.35, y: 48.85 }, Coord { x: 4.84, y: 45.76 }];
//! let leg = provider.route(&points, TravelProfile::Driving).await?;
//! println!("{:.1} km", leg.distance_km());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use reqwest::{Client, StatusCode};
use stayplan_core::{RouteLeg, RouteProvider, RouteSource, RoutingError, TravelProfile};
use url::Url;

use crate::error::ProviderBuildError;
use crate::retry::RetryPolicy;
use crate::wire::RouteResponse;

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "stayplan-routing/0.1";

/// Public OSRM demo server.
pub const DEFAULT_OPEN_ROUTING_URL: &str = "https://router.project-osrm.org";

/// Commercial directions API host.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.mapbox.com";

/// Coordinate cap of the commercial directions API.
pub const DIRECTIONS_MAX_POINTS: usize = 25;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Which route service family the provider targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlavour {
    /// OSRM Route API: `/route/v1/{car|bike|foot}/...`.
    OpenRouting,
    /// Directions API: `/directions/v5/mapbox/{driving|cycling|walking}/...`.
    Directions,
}

impl ServiceFlavour {
    const fn source(self) -> RouteSource {
        match self {
            Self::OpenRouting => RouteSource::OpenRouting,
            Self::Directions => RouteSource::Directions,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::OpenRouting => "open-routing",
            Self::Directions => "directions",
        }
    }
}

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone)]
pub struct HttpRouteProviderConfig {
    /// Service family.
    pub flavour: ServiceFlavour,
    /// Base URL for the service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Access token; required for [`ServiceFlavour::Directions`].
    pub access_token: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Largest coordinate count per request, when bounded.
    pub max_points: Option<usize>,
    /// Backoff for rate-limited responses.
    pub retry: RetryPolicy,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self::open_routing(DEFAULT_OPEN_ROUTING_URL)
    }
}

impl HttpRouteProviderConfig {
    /// Configure an open routing service at `base_url`.
    #[must_use]
    pub fn open_routing(base_url: impl Into<String>) -> Self {
        Self {
            flavour: ServiceFlavour::OpenRouting,
            base_url: base_url.into(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_points: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Configure the commercial directions API at `base_url`.
    #[must_use]
    pub fn directions(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            flavour: ServiceFlavour::Directions,
            access_token: Some(access_token.into()),
            max_points: Some(DIRECTIONS_MAX_POINTS),
            ..Self::open_routing(base_url)
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the coordinate cap.
    #[must_use]
    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points = max_points;
        self
    }

    /// Set the rate-limit backoff.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// HTTP route provider for the open routing service and directions API.
#[derive(Debug)]
pub struct HttpRouteProvider {
    client: Client,
    config: HttpRouteProviderConfig,
}

impl HttpRouteProvider {
    /// Create an open routing provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::open_routing(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, a directions provider has no
    /// access token, or the HTTP client fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if config.flavour == ServiceFlavour::Directions
            && config.access_token.as_deref().is_none_or(str::is_empty)
        {
            return Err(ProviderBuildError::MissingAccessToken);
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Service family this provider targets.
    #[must_use]
    pub const fn flavour(&self) -> ServiceFlavour {
        self.config.flavour
    }

    /// Build the request URL without credentials.
    ///
    /// The format is `{base_url}/route/v1/{profile}/{coordinates}` for the
    /// open routing service and
    /// `{base_url}/directions/v5/mapbox/{profile}/{coordinates}` for the
    /// directions API, where coordinates are semicolon-separated `lon,lat`
    /// pairs.
    fn build_route_url(&self, points: &[Coord<f64>], profile: TravelProfile) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{},{}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(";");
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.flavour {
            ServiceFlavour::OpenRouting => format!(
                "{base}/route/v1/{}/{coords}?overview=full&geometries=geojson",
                profile.osrm_profile()
            ),
            ServiceFlavour::Directions => format!(
                "{base}/directions/v5/mapbox/{}/{coords}?overview=full&geometries=geojson",
                profile.directions_profile()
            ),
        }
    }

    /// Fetch one route without retrying.
    async fn fetch_route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        let url = self.build_route_url(points, profile);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.access_token {
            request = request.query(&[("access_token", token.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited { url });
        }
        let response = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let route_response: RouteResponse =
            response
                .json()
                .await
                .map_err(|err| RoutingError::Malformed {
                    message: err.to_string(),
                })?;

        self.convert_response(route_response)
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RoutingError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoutingError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert a service response to a `RouteLeg`.
    fn convert_response(&self, response: RouteResponse) -> Result<RouteLeg, RoutingError> {
        if !response.is_ok() {
            return Err(RoutingError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::Service {
                code: "NoRoute".to_owned(),
                message: "response contained no routes".to_owned(),
            })?;

        if !(route.distance.is_finite() && route.distance >= 0.0)
            || !(route.duration.is_finite() && route.duration >= 0.0)
        {
            return Err(RoutingError::Malformed {
                message: format!(
                    "invalid totals: distance {} duration {}",
                    route.distance, route.duration
                ),
            });
        }

        let coordinates = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coord { x: lon, y: lat })
            .collect();

        Ok(RouteLeg::new(
            coordinates,
            route.distance,
            route.duration,
            self.config.flavour.source(),
        ))
    }
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    fn name(&self) -> &'static str {
        self.config.flavour.name()
    }

    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InsufficientInput);
        }
        if let Some(limit) = self.config.max_points
            && points.len() > limit
        {
            return Err(RoutingError::Unsupported {
                reason: format!("{} accepts at most {limit} points", self.name()),
            });
        }

        self.config
            .retry
            .run(self.name(), || self.fetch_route(points, profile))
            .await
    }

    fn max_points(&self) -> Option<usize> {
        self.config.max_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{LineString, RouteEntry};
    use rstest::{fixture, rstest};

    #[fixture]
    fn sample_points() -> Vec<Coord<f64>> {
        vec![Coord { x: -0.1, y: 51.5 }, Coord { x: -0.2, y: 51.6 }]
    }

    fn ok_response(distance: f64) -> RouteResponse {
        RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![RouteEntry {
                geometry: LineString {
                    coordinates: vec![[-0.1, 51.5], [-0.15, 51.55], [-0.2, 51.6]],
                },
                distance,
                duration: 900.0,
            }],
        }
    }

    #[rstest]
    fn open_routing_url_uses_osrm_profile(sample_points: Vec<Coord<f64>>) {
        let provider =
            HttpRouteProvider::new("http://osrm.example.com").expect("provider should build");

        let url = provider.build_route_url(&sample_points, TravelProfile::Cycling);

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/bike/-0.1,51.5;-0.2,51.6?overview=full&geometries=geojson"
        );
    }

    #[rstest]
    fn directions_url_uses_directions_profile(sample_points: Vec<Coord<f64>>) {
        let provider = HttpRouteProvider::with_config(HttpRouteProviderConfig::directions(
            "https://api.example.com/",
            "secret",
        ))
        .expect("provider should build");

        let url = provider.build_route_url(&sample_points, TravelProfile::Walking);

        assert!(url.starts_with("https://api.example.com/directions/v5/mapbox/walking/"));
        assert!(!url.contains("secret"), "credentials must not leak into URLs");
    }

    #[rstest]
    fn directions_requires_token() {
        let err = HttpRouteProvider::with_config(HttpRouteProviderConfig::directions(
            DEFAULT_DIRECTIONS_URL,
            "",
        ))
        .expect_err("empty token should be rejected");
        assert!(matches!(err, ProviderBuildError::MissingAccessToken));
    }

    #[rstest]
    fn rejects_invalid_base_url() {
        let err = HttpRouteProvider::new("not a url").expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn convert_response_builds_routed_leg() {
        let provider = HttpRouteProvider::new(DEFAULT_OPEN_ROUTING_URL).expect("should build");

        let leg = provider
            .convert_response(ok_response(12_000.0))
            .expect("should convert");

        assert_eq!(leg.coordinates.len(), 3);
        assert_eq!(leg.coordinates[0], Coord { x: -0.1, y: 51.5 });
        assert!(leg.is_routed());
        assert_eq!(leg.source, RouteSource::OpenRouting);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let provider = HttpRouteProvider::new(DEFAULT_OPEN_ROUTING_URL).expect("should build");
        let response = RouteResponse {
            code: "NoRoute".to_owned(),
            message: Some("Impossible route".to_owned()),
            routes: Vec::new(),
        };

        let err = provider.convert_response(response).expect_err("should fail");

        assert_eq!(
            err,
            RoutingError::Service {
                code: "NoRoute".to_owned(),
                message: "Impossible route".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(-1.0)]
    fn convert_response_rejects_invalid_totals(#[case] distance: f64) {
        let provider = HttpRouteProvider::new(DEFAULT_OPEN_ROUTING_URL).expect("should build");

        let err = provider
            .convert_response(ok_response(distance))
            .expect_err("should fail");

        assert!(matches!(err, RoutingError::Malformed { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_too_many_points_for_directions() {
        let provider = HttpRouteProvider::with_config(HttpRouteProviderConfig::directions(
            DEFAULT_DIRECTIONS_URL,
            "token",
        ))
        .expect("should build");
        let points: Vec<Coord<f64>> = (0..26)
            .map(|i| Coord {
                x: f64::from(i) * 0.01,
                y: 45.0,
            })
            .collect();

        let err = provider
            .route(&points, TravelProfile::Driving)
            .await
            .expect_err("should refuse");

        assert!(matches!(err, RoutingError::Unsupported { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn single_point_is_insufficient() {
        let provider = HttpRouteProvider::new(DEFAULT_OPEN_ROUTING_URL).expect("should build");

        let err = provider
            .route(&[Coord { x: 0.0, y: 0.0 }], TravelProfile::Driving)
            .await
            .expect_err("should fail");

        assert_eq!(err, RoutingError::InsufficientInput);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpRouteProviderConfig::open_routing("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_max_points(Some(10))
            .with_retry(RetryPolicy::none());

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.max_points, Some(10));
        assert_eq!(config.retry.max_retries, 0);
    }
}
