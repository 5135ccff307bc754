//! Bounded retry with a fixed delay.
//!
//! # Overview
//!
//! - [`RetryPolicy`]: how many attempts a call gets and how long to wait
//!   between them
//! - [`retry_with_policy`]: runs an async operation under a policy
//!
//! Only retryable errors (see [`ClientError::is_retryable`]) are retried, which
//! in practice means transport failures. A non-2xx response is a successful
//! exchange as far as retrying is concerned.
//!
//! There is no jitter and no exponential growth: every wait is exactly
//! `delay`, and no wait follows the final attempt.

use std::future::Future;
use std::time::Duration;

use crate::ClientError;

/// Default configuration values.
pub mod defaults {
    use std::time::Duration;

    /// Default number of retry attempts (0 means "try once").
    pub const RETRY_TIMES: u32 = 0;

    /// Default delay between attempts.
    pub const RETRY_DELAY: Duration = Duration::ZERO;
}

/// Configuration for retry behavior.
///
/// `retry_times` is the total number of attempts, with `0` treated as `1`.
///
/// # Example
///
/// ```
/// use restc::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .retry_times(3)
///     .delay(Duration::from_millis(200));
/// assert_eq!(policy.attempts(), 3);
///
/// assert_eq!(RetryPolicy::new().attempts(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts; `0` behaves like `1`.
    pub retry_times: u32,

    /// Wait between two consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_times: defaults::RETRY_TIMES,
            delay: defaults::RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a new RetryPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::default()
    }

    /// Set the total number of attempts.
    pub fn retry_times(mut self, retry_times: u32) -> Self {
        self.retry_times = retry_times;
        self
    }

    /// Set the delay between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of attempts a call gets under this policy.
    pub fn attempts(&self) -> u32 {
        self.retry_times.max(1)
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are used up.
///
/// The factory receives the 1-based attempt number. When every attempt
/// fails, the error from the last attempt is returned.
///
/// # Example
///
/// ```ignore
/// let policy = RetryPolicy::new().retry_times(3).delay(Duration::from_millis(100));
///
/// let response = retry_with_policy(&policy, |attempt| async move {
///     transport.send(build_request()?).await
/// }).await?;
/// ```
pub async fn retry_with_policy<F, Fut, T>(policy: &RetryPolicy, mut f: F) -> Result<T, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match f(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < attempts => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    error = %e,
                    attempt,
                    attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "retrying after transport error"
                );
                #[cfg(not(feature = "tracing"))]
                let _ = e;
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
