//! Transient-failure retry with exponential backoff.
//!
//! The policy is independent of any provider variant: variants decide what
//! counts as transient through their error classification, and this policy
//! only decides how transient failures are re-attempted. Non-transient
//! errors propagate immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ProviderError;

/// Default number of attempts (first call included).
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first re-attempt.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default backoff multiplier between attempts.
const DEFAULT_MULTIPLIER: u32 = 2;

/// Bounded-attempt exponential backoff policy for transient provider errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_MULTIPLIER)
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to a minimum of 1.
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
        }
    }

    /// Run `op`, re-attempting transient failures with exponential backoff.
    ///
    /// Sleeps suspend only the calling task. Once attempts are exhausted the
    /// last transient error is surfaced; permanent and malformed-request
    /// errors propagate from the attempt that produced them.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient provider failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= self.multiplier;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
