//! Backoff for rate-limited requests.

use std::future::Future;
use std::time::Duration;

use stayplan_core::RoutingError;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default backoff unit; the n-th retry waits `n` times this long.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Linear backoff applied to retryable routing failures.
///
/// Only [`RoutingError::is_retryable`] errors (HTTP 429) are retried; every
/// other outcome is returned after the first attempt.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stayplan_routing::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_for(1), Duration::from_secs(2));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Backoff unit.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Set the number of retries after the first attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff unit.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `operation`, retrying retryable failures with linear backoff.
    ///
    /// `label` identifies the caller in log output.
    ///
    /// # Errors
    /// Returns the last error once retries are exhausted, or the first
    /// non-retryable error.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RoutingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RoutingError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "{label}: {err}; retry {attempt}/{} in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }
}
