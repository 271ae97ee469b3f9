//! Retry with exponential back-off and jitter for the catalog client.
//!
//! The catalog fetch is a single large read, so every transient failure is
//! worth another attempt. Application-level failures are returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::SupplierError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** wrong credentials or any other `"success": false`
/// answer, malformed payloads, configuration errors.
pub(crate) fn is_retriable(err: &SupplierError) -> bool {
    match err {
        SupplierError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| {
                    s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                })
        }
        SupplierError::ApiError(_)
        | SupplierError::Deserialize { .. }
        | SupplierError::InvalidBaseUrl { .. }
        | SupplierError::MissingCredentials => false,
    }
}

/// Longest wait between two attempts.
const MAX_DELAY_MS: u64 = 60_000;

/// Wait before retry number `retry` (1-based), before jitter.
///
/// With `backoff_base_ms = 1_000`: 1 s, 2 s, 4 s, ... capped at 60 s.
fn backoff_ms(retry: u32, backoff_base_ms: u64) -> u64 {
    let factor = 1u64 << retry.saturating_sub(1).min(10);
    backoff_base_ms.saturating_mul(factor).min(MAX_DELAY_MS)
}

/// Scales `delay_ms` by `0.75 + 0.5 * unit`, where `unit` is in `[0, 1)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn with_jitter(delay_ms: u64, unit: f64) -> u64 {
    (delay_ms as f64 * (0.75 + 0.5 * unit)) as u64
}

/// Runs `operation`, retrying transient failures up to `max_retries` times
/// with jittered exponential back-off (see [`backoff_ms`]).
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SupplierError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SupplierError>>,
{
    let mut retries = 0u32;
    let err = loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && retries < max_retries => err,
            Err(err) => break err,
        };
        retries += 1;
        let delay_ms = with_jitter(backoff_ms(retries, backoff_base_ms), rand::random::<f64>());
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms,
            error = %err,
            "supplier catalog fetch failed, retrying after back-off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    };
    if retries > 0 {
        tracing::warn!(retries, error = %err, "supplier catalog fetch gave up");
    }
    Err(err)
}
