//! Rate limiting and retry utilities for the Shopify Admin session.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses and GraphQL throttling. Non-retriable errors
//! (validation failures, 404s, parse failures) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ShopifyError::RateLimited`]: HTTP 429 or a `THROTTLED` GraphQL error.
/// - [`ShopifyError::Http`]: connection failure or timeout.
/// - [`ShopifyError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else is returned on the first failure.
fn is_retriable(err: &ShopifyError) -> bool {
    match err {
        ShopifyError::RateLimited { .. } => true,
        ShopifyError::Http(e) => e.is_connect() || e.is_timeout(),
        ShopifyError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before retry `n` (1-based) is `backoff_base_ms * 2^(n-1)`, or the
/// server's `Retry-After` if that is longer. At most `max_retries` additional
/// attempts are made; the last error is returned once they are exhausted.
///
/// | Attempt | Sleep before next attempt (`backoff_base_ms = 500`) |
/// |---------|------------------------------------------------------|
/// | 0 (initial) | none |
/// | 1 | 500 ms |
/// | 2 | 1 000 ms |
/// | 3 | 2 000 ms |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let backoff_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(20));
        let delay_ms = match &err {
            ShopifyError::RateLimited { retry_after_secs } => {
                backoff_ms.max(retry_after_secs.saturating_mul(1_000))
            }
            _ => backoff_ms,
        };
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient Shopify error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}
