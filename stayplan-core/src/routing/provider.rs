//! Route provider trait for ordered coordinate sequences.

use async_trait::async_trait;
use geo::Coord;

use crate::{RouteLeg, TravelProfile};

use super::error::RoutingError;

/// Compute a route through an ordered list of coordinates.
///
/// Implementations must return `Err(RoutingError::InsufficientInput)` when
/// fewer than two points are supplied, and should surface their own limits
/// (point caps, two-point-only services) as
/// [`RoutingError::Unsupported`].
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use stayplan_core::{RouteLeg, RouteProvider, RouteSource, RoutingError, TravelProfile};
///
/// struct TeleportProvider;
///
/// #[async_trait]
/// impl RouteProvider for TeleportProvider {
///     fn name(&self) -> &'static str {
///         "teleport"
///     }
///
///     async fn route(
///         &self,
///         points: &[Coord<f64>],
///         _profile: TravelProfile,
///     ) -> Result<RouteLeg, RoutingError> {
///         if points.len() < 2 {
///             return Err(RoutingError::InsufficientInput);
///         }
///         Ok(RouteLeg::new(points.to_vec(), 0.0, 0.0, RouteSource::OpenRouting))
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
/// let leg = TeleportProvider.route(&points, TravelProfile::Driving).await?;
/// assert_eq!(leg.coordinates.len(), 2);
/// # Ok::<(), RoutingError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Short provider name used in logs and `Unavailable` errors.
    fn name(&self) -> &'static str;

    /// Return the route through `points` for `profile`.
    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError>;

    /// Largest number of points accepted in one request, when bounded.
    fn max_points(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
impl<P> RouteProvider for std::sync::Arc<P>
where
    P: RouteProvider + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn route(
        &self,
        points: &[Coord<f64>],
        profile: TravelProfile,
    ) -> Result<RouteLeg, RoutingError> {
        (**self).route(points, profile).await
    }

    fn max_points(&self) -> Option<usize> {
        (**self).max_points()
    }
}
