//! Core domain types for the Stayplan itinerary engine.
//!
//! The crate defines the waypoint model shared by every engine stage, the
//! [`RouteLeg`] value produced by routing, the great-circle geometry helpers,
//! the chunker/combiner used to fit long waypoint sequences into provider
//! request limits, and the asynchronous [`RouteProvider`] boundary that HTTP
//! adapters implement.
//!
//! Constructors validate their input and return `Result` so malformed
//! coordinates are rejected before they reach a routing service.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chunk;
pub mod geometry;
mod profile;
mod route;
pub mod routing;
mod waypoint;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use chunk::{ChunkError, chunk, combine};
pub use profile::{TravelProfile, TravelProfileParseError};
pub use route::{Provenance, RouteLeg, RouteSource};
pub use routing::{RouteProvider, RoutingError};
pub use waypoint::{StopRole, Waypoint, WaypointError};
