//! Test utilities for routing providers.
//!
//! This module provides [`StubRouteProvider`], a deterministic test double
//! for [`RouteProvider`] that returns pre-configured responses without
//! making actual HTTP requests. It records every request it receives and the
//! peak number of requests in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use stayplan_core::geometry::path_length_km;
use stayplan_core::{RouteLeg, RouteProvider, RouteSource, RoutingError, TravelProfile};

/// Stub `RouteProvider` for testing.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use stayplan_core::{RouteProvider, RouteSource, TravelProfile};
/// use stayplan_routing::test_support::StubRouteProvider;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let provider = StubRouteProvider::echoing("osrm", RouteSource::OpenRouting);
/// let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 }];
///
/// let leg = provider.route(&points, TravelProfile::Driving).await.unwrap();
/// assert_eq!(leg.coordinates.len(), 2);
/// assert_eq!(provider.calls(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct StubRouteProvider {
    name: &'static str,
    response: StubResponse,
    delay: Option<Duration>,
    max_points: Option<usize>,
    failure_at: Option<(Coord<f64>, RoutingError)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<Vec<Coord<f64>>>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Echo(RouteSource),
    Leg(RouteLeg),
    Error(RoutingError),
}

impl StubRouteProvider {
    fn with_response(name: &'static str, response: StubResponse) -> Self {
        Self {
            name,
            response,
            delay: None,
            max_points: None,
            failure_at: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that echoes the input polyline.
    ///
    /// Distance is the great-circle length; duration assumes the profile's
    /// average speed. Legs are tagged with `source`.
    #[must_use]
    pub fn echoing(name: &'static str, source: RouteSource) -> Self {
        Self::with_response(name, StubResponse::Echo(source))
    }

    /// Create a provider that returns `leg` for any valid input.
    #[must_use]
    pub fn with_leg(name: &'static str, leg: RouteLeg) -> Self {
        Self::with_response(name, StubResponse::Leg(leg))
    }

    /// Create a provider that returns the given error.
    ///
    /// Fewer than two points still return `RoutingError::InsufficientInput`.
    #[must_use]
    pub fn failing(name: &'static str, error: RoutingError) -> Self {
        Self::with_response(name, StubResponse::Error(error))
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Advertise a point cap through [`RouteProvider::max_points`].
    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }

    /// Fail with `error` on any request whose first point is `start`.
    ///
    /// Other requests get the configured response, so a single chunk of a
    /// longer sequence can be made to fail.
    #[must_use]
    pub fn with_failure_at(mut self, start: Coord<f64>, error: RoutingError) -> Self {
        self.failure_at = Some((start, error));
        self
    }

    /// Number of `route` calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Largest number of requests observed in flight at once.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Point sequences received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Coord<f64>>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Decrements the in-flight count when a request finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(points.to_vec());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if points.len() < 2 {
            return Err(RoutingError::InsufficientInput);
        }
        if let Some((start, error)) = &self.failure_at
            && points.first() == Some(start)
        {
            return Err(error.clone());
        }

        match &self.response {
            StubResponse::Echo(source) => {
                let km = path_length_km(points);
                Ok(RouteLeg::new(
                    points.to_vec(),
                    km * 1000.0,
                    km / profile.assumed_speed_kmh() * 3600.0,
                    *source,
                ))
            }
            StubResponse::Leg(leg) => Ok(leg.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    fn max_points(&self) -> Option<usize> {
        self.max_points
    }
}
