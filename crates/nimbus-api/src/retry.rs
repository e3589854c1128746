//! Retry policy for provider calls
//!
//! Retries are deliberately capped low: the provider's rate limits are
//! global and the orchestrator paces requests across many concurrent
//! resource operations, so this layer only smooths over transient
//! transport failures and throttling, with a long backoff cap to give the
//! provider room to recover.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Upper bound on the delay between retries.
    pub max_delay: Duration,

    /// Backoff multiplier applied after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Runs `operation` under the policy, retrying only retryable failures.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && err.is_retryable() => {
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying provider call"
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.backoff_multiplier).min(policy.max_delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
