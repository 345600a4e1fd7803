//! Routing adapters for the Stayplan engine.
//!
//! Responsibilities:
//! - Implement [`stayplan_core::RouteProvider`] over HTTP for the open
//!   routing service, the commercial directions API and the two-point proxy.
//! - Retry rate-limited requests with linear backoff.
//! - Combine providers into a [`ProviderChain`] that chunks long sequences,
//!   falls back in priority order, and ends with a straight-line estimate.
//!
//! Boundaries:
//! - Do not encode planning rules (grouping and allocation live in
//!   `stayplan-planner`).
//! - Every network call carries a timeout; callers may cancel in flight.
//!
//! Invariants:
//! - [`ProviderChain::route`] only fails on insufficient input or
//!   cancellation.
//! - No global mutable state; the proxy probe result lives on the provider.

#![forbid(unsafe_code)]

mod chain;
mod error;
mod http;
mod proxy;
mod retry;
mod straight_line;
mod wire;

#[doc(hidden)]
pub mod test_support;

pub use chain::{
    ChainConfig, DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY, DEFAULT_SINGLE_REQUEST_LIMIT,
    ProviderChain,
};
pub use error::ProviderBuildError;
pub use http::{
    DEFAULT_DIRECTIONS_URL, DEFAULT_OPEN_ROUTING_URL, DEFAULT_USER_AGENT, DIRECTIONS_MAX_POINTS,
    HttpRouteProvider, HttpRouteProviderConfig, ServiceFlavour,
};
pub use proxy::{ProxyRouteProvider, ProxyRouteProviderConfig};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy};
pub use straight_line::straight_line;
