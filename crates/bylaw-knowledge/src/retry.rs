//! Bounded retry with a fixed backoff for knowledge service calls.
//!
//! The whole attempt is retried, not just the transport: a reply that
//! arrives but cannot be parsed is as much a failure as a refused
//! connection. Attempts run sequentially and the default policy allows
//! exactly one retry.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Pause between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Single retry with a caller-chosen backoff.
    pub fn single_retry(backoff: Duration) -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff,
        }
    }

    /// Total attempts this policy allows.
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Run `f` until it succeeds or the policy is exhausted.
///
/// The closure is called up to `policy.max_retries + 1` times with
/// `policy.backoff` between calls. The last error is returned as-is.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, operation: &str, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    for attempt in 0..policy.max_retries {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    "knowledge service call failed, retrying in {:?}: {e}",
                    policy.backoff
                );
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
    // Final attempt, no more retries.
    f().await
}
