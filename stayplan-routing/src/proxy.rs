//! Two-point routing proxy.
//!
//! The proxy is a thin serverless function in front of a routing service. It
//! only routes between a start and an end point, may omit geometry, and is
//! often absent in local deployments, so the provider probes it once and
//! remembers the answer.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use reqwest::Client;
use stayplan_core::geometry::interpolate;
use stayplan_core::{RouteLeg, RouteProvider, RouteSource, RoutingError, TravelProfile};
use tokio::sync::OnceCell;
use url::Url;

use crate::error::ProviderBuildError;
use crate::http::DEFAULT_USER_AGENT;
use crate::retry::RetryPolicy;
use crate::wire::ProxyResponse;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default availability probe timeout in seconds.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 2;

/// Query string of the availability probe: a short hop in central Paris.
const PROBE_QUERY: &str = "mode=driving&start=2.35,48.85&end=2.36,48.86";

/// Minimum segment count of a synthesised polyline.
const MIN_SEGMENTS: usize = 20;

/// Kilometres covered by one synthesised segment beyond the minimum.
const KM_PER_SEGMENT: f64 = 40.0;

/// Configuration for [`ProxyRouteProvider`].
#[derive(Debug, Clone)]
pub struct ProxyRouteProviderConfig {
    /// Base URL under which `/route` is served.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// Availability probe timeout.
    pub probe_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Backoff applied to rate-limited route requests.
    pub retry: RetryPolicy,
}

impl ProxyRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the backoff for rate-limited requests.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the availability probe timeout.
    #[must_use]
    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }
}

/// Route provider backed by the two-point proxy.
///
/// Requests with anything other than two points are declined with
/// [`RoutingError::Unsupported`]. When the proxy answers without geometry the
/// provider synthesises a straight polyline of `max(20, ceil(km / 40))`
/// segments while keeping the proxy's distance and duration.
#[derive(Debug)]
pub struct ProxyRouteProvider {
    client: Client,
    config: ProxyRouteProviderConfig,
    available: OnceCell<bool>,
}

impl ProxyRouteProvider {
    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: ProxyRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            available: OnceCell::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/route", self.config.base_url.trim_end_matches('/'))
    }

    /// Report whether the proxy answered its probe; probed at most once.
    pub async fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.probe()).await
    }

    async fn probe(&self) -> bool {
        let url = format!("{}?{PROBE_QUERY}", self.endpoint());
        let outcome = self
            .client
            .get(&url)
            .timeout(self.config.probe_timeout)
            .send()
            .await;
        match outcome {
            Ok(response) if response.status().is_success() => {
                log::debug!("routing proxy at {url} is available");
                true
            }
            Ok(response) => {
                log::warn!("routing proxy probe returned {}", response.status());
                false
            }
            Err(err) => {
                log::warn!("routing proxy probe failed: {err}");
                false
            }
        }
    }

    async fn fetch_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        let url = format!(
            "{}?mode={}&start={},{}&end={},{}&geometry=true",
            self.endpoint(),
            profile.directions_profile(),
            start.x,
            start.y,
            end.x,
            end.y
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|err| RoutingError::Malformed {
                message: err.to_string(),
            })?;

        convert_response(body, start, end, profile)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if let Some(status) = error.status() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return RoutingError::RateLimited {
                    url: url.to_owned(),
                };
            }
            RoutingError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            RoutingError::Network {
                url: url.to_owned(),
                message: error.to_string(),
            }
        }
    }
}

/// Turn a proxy answer into a leg, synthesising geometry when it is missing.
fn convert_response(
    body: ProxyResponse,
    start: Coord<f64>,
    end: Coord<f64>,
    profile: TravelProfile,
) -> Result<RouteLeg, RoutingError> {
    let km = match body.km {
        Some(km) if body.ok && km.is_finite() && km > 0.0 => km,
        _ => {
            return Err(RoutingError::Service {
                code: "ProxyError".to_owned(),
                message: body.error.unwrap_or_else(|| "no route data".to_owned()),
            });
        }
    };
    let duration_s = body
        .minutes
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
        .map_or_else(|| km / profile.assumed_speed_kmh() * 3600.0, |m| m * 60.0);

    let coordinates = match body.geometry {
        Some(line) if line.coordinates.len() >= 2 => line
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coord { x: lon, y: lat })
            .collect(),
        _ => interpolate(start, end, synthetic_segments(km)),
    };

    Ok(RouteLeg::new(
        coordinates,
        km * 1000.0,
        duration_s,
        RouteSource::Proxy,
    ))
}

fn synthetic_segments(km: f64) -> usize {
    let extra = (km / KM_PER_SEGMENT).ceil();
    MIN_SEGMENTS.max(extra as usize)
}

#[async_trait]
impl RouteProvider for ProxyRouteProvider {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        let [start, end] = points else {
            if points.len() < 2 {
                return Err(RoutingError::InsufficientInput);
            }
            return Err(RoutingError::Unsupported {
                reason: format!("proxy routes two points, got {}", points.len()),
            });
        };
        if !self.is_available().await {
            return Err(RoutingError::Unavailable {
                provider: self.name().to_owned(),
            });
        }
        self.config
            .retry
            .run(self.name(), || self.fetch_route(*start, *end, profile))
            .await
    }

    fn max_points(&self) -> Option<usize> {
        Some(2)
    }
}
