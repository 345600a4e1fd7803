//! Ordered provider fallback.
//!
//! [`ProviderChain`] tries the open routing service, then the directions API,
//! then (for two-point requests) the proxy, and finally approximates the route
//! with straight lines. Sequences longer than the single-request limit are
//! chunked: the primary provider receives the chunks with a bounded number in
//! flight, the secondary provider receives them one after another.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use geo::Coord;
use log::{debug, info, warn};
use stayplan_core::{RouteLeg, RouteProvider, RoutingError, TravelProfile, chunk, combine};
use tokio_util::sync::CancellationToken;

use crate::straight_line::straight_line;

/// Requests at or below this many points are sent without chunking.
pub const DEFAULT_SINGLE_REQUEST_LIMIT: usize = 25;

/// Points per chunk when a sequence must be split.
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Requests in flight at once against one provider.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Tuning for [`ProviderChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// Largest sequence routed in one request.
    pub single_request_limit: usize,
    /// Points per chunk for longer sequences.
    pub chunk_size: usize,
    /// Requests in flight at once against one provider.
    pub concurrency: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            single_request_limit: DEFAULT_SINGLE_REQUEST_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ChainConfig {
    /// Set the single-request limit.
    #[must_use]
    pub const fn with_single_request_limit(mut self, limit: usize) -> Self {
        self.single_request_limit = limit;
        self
    }

    /// Set the chunk size; values below 2 are raised to 2.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size < 2 { 2 } else { chunk_size };
        self
    }

    /// Set the in-flight bound; zero is raised to 1.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 { 1 } else { concurrency };
        self
    }
}

/// Routing with ordered fallback and a straight-line last resort.
///
/// Every slot is optional; a missing provider counts as a failure. The only
/// errors surfaced are [`RoutingError::InsufficientInput`] and
/// [`RoutingError::Cancelled`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stayplan_core::{Provenance, TravelProfile};
/// use stayplan_routing::{ChainConfig, ProviderChain};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// // No providers configured: the chain degrades to straight lines.
/// let chain = ProviderChain::new(ChainConfig::default());
/// let points = [Coord { x: 2.35, y: 48.85 }, Coord { x: 4.84, y: 45.76 }];
/// let leg = chain
///     .route(&points, TravelProfile::Driving, &CancellationToken::new())
///     .await
///     .unwrap();
/// assert_eq!(leg.provenance, Provenance::Approximated);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct ProviderChain {
    primary: Option<Arc<dyn RouteProvider>>,
    secondary: Option<Arc<dyn RouteProvider>>,
    proxy: Option<Arc<dyn RouteProvider>>,
    config: ChainConfig,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("primary", &self.primary.as_ref().map(|p| p.name()))
            .field("secondary", &self.secondary.as_ref().map(|p| p.name()))
            .field("proxy", &self.proxy.as_ref().map(|p| p.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl ProviderChain {
    /// Create a chain with no providers.
    #[must_use]
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the first provider tried (the open routing service).
    #[must_use]
    pub fn with_primary(mut self, provider: impl RouteProvider + 'static) -> Self {
        self.primary = Some(Arc::new(provider));
        self
    }

    /// Set the provider tried after the primary (the directions API).
    #[must_use]
    pub fn with_secondary(mut self, provider: impl RouteProvider + 'static) -> Self {
        self.secondary = Some(Arc::new(provider));
        self
    }

    /// Set the two-point proxy.
    #[must_use]
    pub fn with_proxy(mut self, provider: impl RouteProvider + 'static) -> Self {
        self.proxy = Some(Arc::new(provider));
        self
    }

    /// Chain tuning.
    #[must_use]
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Route through `points`, falling back provider by provider.
    ///
    /// # Errors
    /// Returns [`RoutingError::InsufficientInput`] for fewer than two points
    /// and [`RoutingError::Cancelled`] when `cancel` fires first.
    pub async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
        cancel: &CancellationToken,
    ) -> Result<RouteLeg, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InsufficientInput);
        }
        ensure_live(cancel)?;

        let routed = if points.len() <= self.config.single_request_limit {
            self.route_direct(points, profile, cancel).await?
        } else {
            self.route_chunked(points, profile, cancel).await?
        };

        if let Some(leg) = routed {
            return Ok(leg);
        }
        ensure_live(cancel)?;
        warn!(
            "no routing service available for {} points; approximating with straight lines",
            points.len()
        );
        Ok(straight_line(points, profile))
    }

    /// Route every consecutive pair of `points` on its own.
    ///
    /// At most [`ChainConfig::concurrency`] pairs are in flight. The result
    /// holds one leg per adjacency, in order.
    ///
    /// # Errors
    /// Same as [`ProviderChain::route`].
    pub async fn route_legs(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
        cancel: &CancellationToken,
    ) -> Result<Vec<RouteLeg>, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InsufficientInput);
        }
        stream::iter(points.windows(2))
            .map(|pair| self.route(pair, profile, cancel))
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn route_direct(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
        cancel: &CancellationToken,
    ) -> Result<Option<RouteLeg>, RoutingError> {
        for provider in [&self.primary, &self.secondary].into_iter().flatten() {
            if let Some(leg) = attempt(provider.as_ref(), points, profile, cancel).await? {
                return Ok(Some(leg));
            }
        }
        if points.len() == 2
            && let Some(proxy) = &self.proxy
        {
            return attempt(proxy.as_ref(), points, profile, cancel).await;
        }
        Ok(None)
    }

    async fn route_chunked(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
        cancel: &CancellationToken,
    ) -> Result<Option<RouteLeg>, RoutingError> {
        let chunks = chunk(points, self.config.chunk_size.max(2))
            .map_err(|_| RoutingError::InsufficientInput)?;
        debug!("{} points split into {} chunks", points.len(), chunks.len());

        if let Some(primary) = &self.primary
            && let Some(legs) = self
                .dispatch_concurrently(primary.as_ref(), &chunks, profile, cancel)
                .await?
        {
            return Ok(combine(&legs).ok());
        }

        if let Some(secondary) = &self.secondary {
            warn!(
                "chunked routing via {} failed; trying {}",
                self.primary_name(),
                secondary.name()
            );
            let mut legs = Vec::with_capacity(chunks.len());
            for part in &chunks {
                match attempt(secondary.as_ref(), part, profile, cancel).await? {
                    Some(leg) => legs.push(leg),
                    None => return Ok(None),
                }
            }
            return Ok(combine(&legs).ok());
        }
        Ok(None)
    }

    /// Send chunks to `provider` with a bounded number in flight.
    ///
    /// Legs come back in chunk order. The first failed chunk discards every
    /// leg gathered so far and drops the requests still in flight.
    async fn dispatch_concurrently(
        &self,
        provider: &dyn RouteProvider,
        chunks: &[&[Coord<f64>]],
        profile: TravelProfile,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<RouteLeg>>, RoutingError> {
        let concurrency = self.config.concurrency.max(1);
        debug!(
            "dispatching {} chunks to {}, {concurrency} at a time",
            chunks.len(),
            provider.name()
        );
        let mut results = stream::iter(chunks)
            .map(|part| attempt(provider, part, profile, cancel))
            .buffered(concurrency);
        let mut legs = Vec::with_capacity(chunks.len());
        while let Some(result) = results.next().await {
            match result? {
                Some(leg) => legs.push(leg),
                None => return Ok(None),
            }
        }
        Ok(Some(legs))
    }

    fn primary_name(&self) -> &'static str {
        self.primary.as_ref().map_or("no primary", |p| p.name())
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), RoutingError> {
    if cancel.is_cancelled() {
        Err(RoutingError::Cancelled)
    } else {
        Ok(())
    }
}

/// Call one provider, racing cancellation.
///
/// Returns `Ok(None)` for absorbable failures so the caller can fall through.
async fn attempt(
    provider: &dyn RouteProvider,
    points: &[Coord<f64>],
    profile: TravelProfile,
    cancel: &CancellationToken,
) -> Result<Option<RouteLeg>, RoutingError> {
    ensure_live(cancel)?;
    if let Some(limit) = provider.max_points()
        && points.len() > limit
    {
        debug!(
            "{} accepts at most {limit} points; skipping {}",
            provider.name(),
            points.len()
        );
        return Ok(None);
    }
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(RoutingError::Cancelled),
        result = provider.route(points, profile) => result,
    };
    match outcome {
        Ok(leg) => {
            info!(
                "{} routed {} points: {:.1} km",
                provider.name(),
                points.len(),
                leg.distance_km()
            );
            Ok(Some(leg))
        }
        Err(err) if err.is_terminal() => Err(err),
        Err(err) => {
            warn!("{} failed: {err}", provider.name());
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubRouteProvider;
    use rstest::{fixture, rstest};
    use stayplan_core::{Provenance, RouteSource};
    use std::time::Duration;

    fn line(count: usize) -> Vec<Coord<f64>> {
        (0..count)
            .map(|i| Coord {
                x: 6.0 + i as f64 * 0.02,
                y: 45.0,
            })
            .collect()
    }

    fn timeout() -> RoutingError {
        RoutingError::Timeout {
            url: "http://osrm.test".into(),
            timeout_secs: 15,
        }
    }

    #[fixture]
    fn cancel() -> CancellationToken {
        CancellationToken::new()
    }

    #[rstest]
    #[tokio::test]
    async fn primary_success_short_circuits(cancel: CancellationToken) {
        let primary = Arc::new(StubRouteProvider::echoing("a", RouteSource::OpenRouting));
        let secondary = Arc::new(StubRouteProvider::echoing("b", RouteSource::Directions));
        let chain = ProviderChain::default()
            .with_primary(Arc::clone(&primary))
            .with_secondary(Arc::clone(&secondary));

        let leg = chain
            .route(&line(5), TravelProfile::Driving, &cancel)
            .await
            .expect("routes");

        assert_eq!(leg.source, RouteSource::OpenRouting);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn proxy_only_used_for_two_points(cancel: CancellationToken) {
        let proxy = Arc::new(StubRouteProvider::echoing("c", RouteSource::Proxy));
        let chain = ProviderChain::default()
            .with_primary(StubRouteProvider::failing("a", timeout()))
            .with_proxy(Arc::clone(&proxy));

        let three = chain
            .route(&line(3), TravelProfile::Driving, &cancel)
            .await
            .expect("degrades");
        assert_eq!(three.provenance, Provenance::Approximated);
        assert_eq!(proxy.calls(), 0);

        let two = chain
            .route(&line(2), TravelProfile::Driving, &cancel)
            .await
            .expect("routes");
        assert_eq!(two.source, RouteSource::Proxy);
        assert_eq!(proxy.calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn chunked_primary_runs_every_chunk(cancel: CancellationToken) {
        let primary = Arc::new(StubRouteProvider::echoing("a", RouteSource::OpenRouting));
        let chain = ProviderChain::default().with_primary(Arc::clone(&primary));
        let points = line(60);

        let leg = chain
            .route(&points, TravelProfile::Driving, &cancel)
            .await
            .expect("routes");

        assert_eq!(primary.calls(), 4);
        assert_eq!(leg.coordinates, points);
        assert!(leg.is_routed());
    }

    #[rstest]
    #[tokio::test]
    async fn single_point_is_rejected(cancel: CancellationToken) {
        let chain = ProviderChain::default();
        let err = chain
            .route(&line(1), TravelProfile::Driving, &cancel)
            .await
            .expect_err("needs two points");
        assert_eq!(err, RoutingError::InsufficientInput);
    }

    #[rstest]
    #[tokio::test]
    async fn cancelled_token_stops_routing(cancel: CancellationToken) {
        cancel.cancel();
        let chain = ProviderChain::default()
            .with_primary(StubRouteProvider::echoing("a", RouteSource::OpenRouting));
        let err = chain
            .route(&line(4), TravelProfile::Driving, &cancel)
            .await
            .expect_err("cancelled");
        assert_eq!(err, RoutingError::Cancelled);
    }

    #[rstest]
    #[tokio::test]
    async fn route_legs_returns_one_leg_per_adjacency(cancel: CancellationToken) {
        let primary = Arc::new(StubRouteProvider::echoing("a", RouteSource::OpenRouting));
        let chain = ProviderChain::default().with_primary(Arc::clone(&primary));

        let legs = chain
            .route_legs(&line(7), TravelProfile::Cycling, &cancel)
            .await
            .expect("routes");

        assert_eq!(legs.len(), 6);
        assert!(legs.iter().all(|leg| leg.coordinates.len() == 2));
        assert_eq!(primary.calls(), 6);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_chunk_reroutes_all_chunks_via_secondary(cancel: CancellationToken) {
        let points = line(60);
        let chunks = chunk(&points, DEFAULT_CHUNK_SIZE).expect("points chunk");
        let primary = Arc::new(
            StubRouteProvider::echoing("a", RouteSource::OpenRouting)
                .with_failure_at(chunks[1][0], timeout()),
        );
        let secondary = Arc::new(StubRouteProvider::echoing("b", RouteSource::Directions));
        let chain = ProviderChain::default()
            .with_primary(Arc::clone(&primary))
            .with_secondary(Arc::clone(&secondary));

        let leg = chain
            .route(&points, TravelProfile::Driving, &cancel)
            .await
            .expect("routes");

        assert_eq!(leg.source, RouteSource::Directions);
        assert_eq!(leg.coordinates, points);
        let resent: Vec<Vec<Coord<f64>>> = chunks.iter().map(|part| part.to_vec()).collect();
        assert_eq!(secondary.requests(), resent);
    }

    #[rstest]
    #[tokio::test]
    async fn secondary_chunk_failure_degrades_to_straight_line(cancel: CancellationToken) {
        let points = line(60);
        let chunks = chunk(&points, DEFAULT_CHUNK_SIZE).expect("points chunk");
        let secondary = Arc::new(
            StubRouteProvider::echoing("b", RouteSource::Directions).with_failure_at(
                chunks[2][0],
                RoutingError::Unavailable {
                    provider: "b".into(),
                },
            ),
        );
        let chain = ProviderChain::default()
            .with_primary(StubRouteProvider::failing("a", timeout()))
            .with_secondary(Arc::clone(&secondary));

        let leg = chain
            .route(&points, TravelProfile::Driving, &cancel)
            .await
            .expect("degrades");

        assert_eq!(leg.source, RouteSource::StraightLine);
        assert_eq!(secondary.calls(), 3, "secondary stops at the failed chunk");
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn chunk_requests_in_flight_stay_bounded(cancel: CancellationToken) {
        let primary = Arc::new(
            StubRouteProvider::echoing("a", RouteSource::OpenRouting)
                .with_delay(Duration::from_secs(1)),
        );
        let chain = ProviderChain::default().with_primary(Arc::clone(&primary));
        let points = line(120);
        let expected_calls = chunk(&points, DEFAULT_CHUNK_SIZE)
            .expect("points chunk")
            .len();

        let leg = chain
            .route(&points, TravelProfile::Driving, &cancel)
            .await
            .expect("routes");

        assert!(leg.is_routed());
        assert_eq!(primary.calls(), expected_calls);
        assert_eq!(primary.peak_in_flight(), DEFAULT_CONCURRENCY);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn route_legs_bounds_requests_in_flight(cancel: CancellationToken) {
        let primary = Arc::new(
            StubRouteProvider::echoing("a", RouteSource::OpenRouting)
                .with_delay(Duration::from_millis(500)),
        );
        let chain = ProviderChain::new(ChainConfig::default().with_concurrency(2))
            .with_primary(Arc::clone(&primary));

        let legs = chain
            .route_legs(&line(6), TravelProfile::Walking, &cancel)
            .await
            .expect("routes");

        assert_eq!(legs.len(), 5);
        assert_eq!(primary.peak_in_flight(), 2);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn cancelling_mid_request_abandons_the_chain(cancel: CancellationToken) {
        let primary = Arc::new(
            StubRouteProvider::echoing("a", RouteSource::OpenRouting)
                .with_delay(Duration::from_secs(30)),
        );
        let secondary = Arc::new(StubRouteProvider::echoing("b", RouteSource::Directions));
        let chain = ProviderChain::default()
            .with_primary(Arc::clone(&primary))
            .with_secondary(Arc::clone(&secondary));
        let points = line(4);

        let (result, ()) = tokio::join!(
            chain.route(&points, TravelProfile::Driving, &cancel),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cancel.cancel();
            }
        );

        assert_eq!(result, Err(RoutingError::Cancelled));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn providers_below_request_size_are_skipped(cancel: CancellationToken) {
        let primary = Arc::new(
            StubRouteProvider::echoing("a", RouteSource::OpenRouting).with_max_points(3),
        );
        let secondary = Arc::new(StubRouteProvider::echoing("b", RouteSource::Directions));
        let chain = ProviderChain::default()
            .with_primary(Arc::clone(&primary))
            .with_secondary(Arc::clone(&secondary));

        let leg = chain
            .route(&line(5), TravelProfile::Driving, &cancel)
            .await
            .expect("routes");

        assert_eq!(leg.source, RouteSource::Directions);
        assert_eq!(primary.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn terminal_provider_errors_are_surfaced(cancel: CancellationToken) {
        let secondary = Arc::new(StubRouteProvider::echoing("b", RouteSource::Directions));
        let chain = ProviderChain::default()
            .with_primary(StubRouteProvider::failing("a", RoutingError::Cancelled))
            .with_secondary(Arc::clone(&secondary));

        let err = chain
            .route(&line(3), TravelProfile::Driving, &cancel)
            .await
            .expect_err("terminal error");

        assert_eq!(err, RoutingError::Cancelled);
        assert_eq!(secondary.calls(), 0);
    }

    #[rstest]
    fn config_clamps_degenerate_values() {
        let config = ChainConfig::default().with_chunk_size(1).with_concurrency(0);
        assert_eq!(config.chunk_size, 2);
        assert_eq!(config.concurrency, 1);
    }
}
