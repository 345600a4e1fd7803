//! Asynchronous routing boundary.
//!
//! A [`RouteProvider`] turns an ordered list of coordinates into a single
//! [`RouteLeg`](crate::RouteLeg). HTTP adapters live in `stayplan-routing`;
//! this module only fixes the contract and the shared error vocabulary so
//! that fallback chains can reason about failures uniformly.

mod error;
mod provider;

pub use error::RoutingError;
pub use provider::RouteProvider;
