//! Facade crate for the Stayplan itinerary engine.
//!
//! This crate re-exports the core domain types and exposes the routing chain
//! and the hub planner behind feature flags.
//!
//! ```
//! # #[cfg(feature = "planner")] {
//! use geo::Coord;
//! use stayplan_engine::{Planner, Waypoint};
//!
//! let stops = vec![
//!     Waypoint::new(1, "Annecy", Coord { x: 6.129, y: 45.899 }).unwrap(),
//!     Waypoint::new(2, "Talloires", Coord { x: 6.213, y: 45.840 }).unwrap(),
//!     Waypoint::new(3, "Lyon", Coord { x: 4.835, y: 45.764 }).unwrap(),
//! ];
//! let report = Planner::default().plan(stops, &[], 5, None);
//! assert_eq!(report.total_nights, 5);
//! assert_eq!(report.groups.len(), 2);
//! # }
//! ```

#![forbid(unsafe_code)]

pub use stayplan_core::{
    ChunkError, Provenance, RouteLeg, RouteProvider, RouteSource, RoutingError, StopRole,
    TravelProfile, TravelProfileParseError, Waypoint, WaypointError, chunk, combine,
};

#[cfg(feature = "routing")]
pub use stayplan_routing::{
    ChainConfig, HttpRouteProvider, HttpRouteProviderConfig, ProviderBuildError, ProviderChain,
    ProxyRouteProvider, ProxyRouteProviderConfig, RetryPolicy,
};

#[cfg(feature = "planner")]
pub use stayplan_planner::{
    AllocationOutcome, AllocationReport, DegenerateReason, Group, Itinerary, PlanReport,
    Planner, PlannerConfig, PlannerConfigError, allocate_nights, compute_dates,
    group_nights_by_place, group_waypoints, nights_for_visit_minutes,
};

#[cfg(feature = "planner")]
pub use stayplan_scorer::{HubScoreWeights, WeightsError, centrality, score_hub, stay_weight};
