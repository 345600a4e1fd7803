use thiserror::Error;

/// Errors returned by [`RouteProvider::route`](super::RouteProvider::route).
///
/// Fallback chains absorb every variant except [`InsufficientInput`] and
/// [`Cancelled`], which are surfaced to the caller unchanged.
///
/// [`InsufficientInput`]: RoutingError::InsufficientInput
/// [`Cancelled`]: RoutingError::Cancelled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Fewer than two coordinates were supplied.
    #[error("at least two waypoints are required to compute a route")]
    InsufficientInput,
    /// The request could not be sent or the connection failed.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Request URL with credentials removed.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL with credentials removed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The request exceeded its deadline.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL with credentials removed.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered HTTP 429.
    #[error("rate limited by {url}")]
    RateLimited {
        /// Request URL with credentials removed.
        url: String,
    },
    /// The response body could not be decoded.
    #[error("malformed routing response: {message}")]
    Malformed {
        /// Decoder error description.
        message: String,
    },
    /// The service decoded correctly but reported a routing failure.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Service status code, e.g. `NoRoute`.
        code: String,
        /// Service-provided message.
        message: String,
    },
    /// The provider cannot handle this request shape.
    #[error("unsupported request: {reason}")]
    Unsupported {
        /// Why the provider declined.
        reason: String,
    },
    /// The provider is not configured or failed its availability probe.
    #[error("provider {provider} is unavailable")]
    Unavailable {
        /// Provider name.
        provider: String,
    },
    /// The caller cancelled the request.
    #[error("routing was cancelled")]
    Cancelled,
}

impl RoutingError {
    /// Report whether a retry after backoff may succeed.
    ///
    /// Only rate limiting qualifies; timeouts count as plain failures.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Report whether a fallback chain must surface this error instead of
    /// trying the next provider.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::InsufficientInput | Self::Cancelled)
    }
}
