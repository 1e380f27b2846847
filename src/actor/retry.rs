//! Retry utilities for mailbox operations with exponential backoff.
//!
//! Only failures that report themselves as rate limiting are retried; every
//! other failure is returned after the first attempt.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::constants::{RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS};

/// Classification hook used by [`with_retry`].
pub trait Retryable {
    /// Whether the failure is a rate-limit signal worth waiting out
    fn is_rate_limited(&self) -> bool;

    /// Error reported when the cancellation token fires
    fn cancelled() -> Self;
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Maximum delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    #[cfg(test)]
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Backoff after the zero-based `attempt` failed: `min(base * 2^attempt, max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Execute an async operation, backing off between rate-limited attempts.
///
/// Cancellation is checked before every attempt and while waiting; either way
/// the operation stops and `E::cancelled()` is returned.
///
/// # Example
/// ```ignore
/// let messages = with_retry(&config, &cancel, || client.list_messages()).await?;
/// ```
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(E::cancelled());
        }

        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if attempt + 1 >= max_attempts || !error.is_rate_limited() {
            return Err(error);
        }

        let delay = config.delay_for(attempt);
        tracing::warn!(
            "Rate limited (attempt {}/{}): {}. Retrying in {:?}...",
            attempt + 1,
            max_attempts,
            error,
            delay
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(E::cancelled()),
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    enum TestError {
        RateLimited,
        Fatal,
        Cancelled,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Retryable for TestError {
        fn is_rate_limited(&self) -> bool {
            matches!(self, TestError::RateLimited)
        }

        fn cancelled() -> Self {
            TestError::Cancelled
        }
    }

    fn fast_config() -> RetryConfig {
        RetryConfig::new(3, Duration::from_millis(10), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let attempts = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32, TestError> = with_retry(&fast_config(), &cancel, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_twice_then_success() {
        let attempts = AtomicU32::new(0);
        let started = Mutex::new(Vec::new());
        let cancel = CancellationToken::new();

        let result: Result<i32, TestError> = with_retry(&fast_config(), &cancel, || {
            started.lock().unwrap().push(Instant::now());
            let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if count < 3 {
                    Err(TestError::RateLimited)
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        let started = started.into_inner().unwrap();
        let first_gap = started[1] - started[0];
        let second_gap = started[2] - started[1];
        assert!(first_gap >= Duration::from_millis(10));
        assert!(second_gap >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32, TestError> = with_retry(&fast_config(), &cancel, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Fatal) }
        })
        .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_attempts() {
        let attempts = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<i32, TestError> = with_retry(&fast_config(), &cancel, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::RateLimited) }
        })
        .await;

        assert_eq!(result, Err(TestError::RateLimited));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_aborts_backoff() {
        let config = RetryConfig::new(3, Duration::from_secs(60), Duration::from_secs(60));
        let attempts = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result: Result<i32, TestError> = with_retry(&config, &cancel, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::RateLimited) }
        })
        .await;

        assert_eq!(result, Err(TestError::Cancelled));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_makes_no_attempt() {
        let attempts = AtomicU32::new(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<i32, TestError> = with_retry(&fast_config(), &cancel, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Ok(1) }
        })
        .await;

        assert_eq!(result, Err(TestError::Cancelled));
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(3), Duration::from_secs(8));
        assert_eq!(config.delay_for(4), Duration::from_secs(10));
        assert_eq!(config.delay_for(40), Duration::from_secs(10));
    }
}
