//! Authenticated session against one store's Shopify Admin API.
//!
//! A [`ShopifySession`] is the handle every catalog call goes through. It is
//! opened once per run with [`ShopifySession::open`] and released with
//! [`ShopifySession::close`], which also runs on drop. Calls made after the
//! session is closed fail with [`ShopifyError::SessionClosed`].

mod lookup;
mod origin;
mod products;
mod variants;

use std::time::Duration;

use reqwest::{Client, Method, Url};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ShopifyError;
use crate::rate_limit::retry_with_backoff;

pub use origin::admin_base_url;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Default throttle before each SKU lookup.
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 1_000;

/// Upper bound on how much of an error body is kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Open session against the Shopify Admin API of a single store.
///
/// Lookups are throttled by a fixed delay before each request. Reads and
/// price updates are retried with exponential backoff on transient errors;
/// product creation and variant deletion are sent exactly once.
pub struct ShopifySession {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
    lookup_delay_ms: u64,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ShopifySession {
    /// Opens a session for `shop_url` using an Admin API access token.
    ///
    /// `shop_url` may omit the scheme (`"promotienda-mx.myshopify.com"`).
    /// Retries are disabled and the lookup delay is
    /// [`DEFAULT_LOOKUP_DELAY_MS`] until configured otherwise.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::MissingToken`] if `access_token` is blank.
    /// - [`ShopifyError::InvalidShopUrl`] if the store URL cannot be used.
    /// - [`ShopifyError::Http`] if the `reqwest::Client` cannot be built.
    pub fn open(
        shop_url: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, ShopifyError> {
        if access_token.trim().is_empty() {
            return Err(ShopifyError::MissingToken);
        }
        let base_url = admin_base_url(shop_url, api_version)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("promosync/0.1 (catalog-sync)")
            .build()?;

        tracing::info!(
            store = %origin::extract_domain(&base_url),
            api_version,
            "Shopify session opened"
        );

        Ok(Self {
            client,
            base_url,
            access_token: Some(access_token.to_owned()),
            lookup_delay_ms: DEFAULT_LOOKUP_DELAY_MS,
            max_retries: 0,
            backoff_base_ms: 1_000,
        })
    }

    /// Sets the delay inserted before every SKU lookup. `0` disables it.
    #[must_use]
    pub fn with_lookup_delay(mut self, lookup_delay_ms: u64) -> Self {
        self.lookup_delay_ms = lookup_delay_ms;
        self
    }

    /// Enables retries on transient failures.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Returns `true` until [`Self::close`] has run.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.access_token.is_some()
    }

    /// Releases the session. Safe to call more than once.
    pub fn close(&mut self) {
        if self.access_token.take().is_some() {
            tracing::info!(
                store = %origin::extract_domain(&self.base_url),
                "Shopify session closed"
            );
        }
    }

    /// Resolves a path relative to the Admin API base.
    fn endpoint(&self, path: &str) -> Result<Url, ShopifyError> {
        self.base_url
            .join(path)
            .map_err(|e| ShopifyError::InvalidShopUrl {
                shop_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// Sends one request with backoff when `retry` is set.
    ///
    /// Returns the parsed JSON body, or `Value::Null` for an empty body.
    async fn send_json(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
        retry: bool,
    ) -> Result<serde_json::Value, ShopifyError> {
        let max_retries = if retry { self.max_retries } else { 0 };
        retry_with_backoff(max_retries, self.backoff_base_ms, || {
            self.send_once(method.clone(), url, body)
        })
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ShopifyError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(ShopifyError::SessionClosed)?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header(ACCESS_TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .map_or(2, whole_seconds);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ShopifyError::Deserialize {
            context: format!("{} response", url.path()),
            source: e,
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(secs: f64) -> u64 {
    secs.max(0.0).ceil() as u64
}

/// Formats a price the way the Admin API expects it: two decimals, half away
/// from zero.
pub(crate) fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

impl Drop for ShopifySession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "../session_test.rs"]
mod tests;
