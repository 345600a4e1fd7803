//! Itinerary structure planning for Stayplan.
//!
//! Given an ordered waypoint sequence, this crate decides where a traveller
//! sleeps and for how long:
//!
//! 1. [`group_waypoints`] partitions the sequence into contiguous groups of
//!    nearby stops and picks one hub per group; the other members become
//!    satellites visited as day trips.
//! 2. [`allocate_nights`] shares a target night count between the hubs in
//!    proportion to their stay weight.
//! 3. [`compute_dates`] turns nights into arrival and departure dates.
//!
//! [`Itinerary`] threads one waypoint sequence through those stages and
//! [`Planner`] runs them all at once. Every stage is synchronous and only
//! reads its inputs and the [`PlannerConfig`] it is given.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocation;
mod config;
mod dates;
mod error;
mod grouping;
mod itinerary;
mod visit;

pub use allocation::{AllocationOutcome, AllocationReport, DegenerateReason, allocate_nights};
pub use config::{
    DEFAULT_DISTANCE_THRESHOLD_KM, DEFAULT_FINAL_STOP_MIN_RATING, DEFAULT_MAX_GROUP_SIZE,
    DEFAULT_MIN_NIGHTS_PER_HUB, PlannerConfig,
};
pub use dates::compute_dates;
pub use error::PlannerConfigError;
pub use grouping::{Group, HubCandidate, adjacency_km, group_waypoints};
pub use itinerary::{Itinerary, PlanReport, Planner};
pub use visit::{group_nights_by_place, nights_for_visit_minutes};
