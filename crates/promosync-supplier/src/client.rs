//! HTTP client for the PromoOpción catalog API.
//!
//! The whole catalog comes back from one `POST {base}/all-products` call that
//! authenticates with user and password in the JSON body. The envelope's
//! `"success"` flag is checked before the product list is read, and a `false`
//! value surfaces as [`SupplierError::ApiError`].

use std::time::Duration;

use promosync_core::{SupplierProduct, SupplierSource, SyncError};
use reqwest::{Client, Url};

use crate::error::SupplierError;
use crate::normalize::normalize_product;
use crate::retry::retry_with_backoff;
use crate::types::PromoProduct;

const DEFAULT_BASE_URL: &str = "https://promocionalesenlinea.net/api";

/// Client for the PromoOpción catalog API.
///
/// Use [`PromoOpcionClient::new`] for production or
/// [`PromoOpcionClient::with_base_url`] to point at a mock server in tests.
pub struct PromoOpcionClient {
    client: Client,
    base_url: Url,
    user: String,
    password: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PromoOpcionClient {
    /// Creates a client pointed at the production catalog API.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::MissingCredentials`] if `user` or `password` is empty.
    /// - [`SupplierError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(user: &str, password: &str, timeout_secs: u64) -> Result<Self, SupplierError> {
        Self::with_base_url(user, password, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::MissingCredentials`] if `user` or `password` is empty.
    /// - [`SupplierError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`SupplierError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn with_base_url(
        user: &str,
        password: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SupplierError> {
        if user.trim().is_empty() || password.trim().is_empty() {
            return Err(SupplierError::MissingCredentials);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("promosync/0.1 (catalog-sync)")
            .build()?;

        // Exactly one trailing slash; `endpoint` pops it before pushing.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SupplierError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            user: user.to_owned(),
            password: password.to_owned(),
            max_retries: 0,
            backoff_base_ms: 1_000,
        })
    }

    /// Enables retries on transient failures.
    ///
    /// `max_retries` is the number of additional attempts after the first.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches and normalizes the full catalog, in supplier order.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_raw_catalog`].
    pub async fn fetch_catalog(&self) -> Result<Vec<SupplierProduct>, SupplierError> {
        let raw = self.fetch_raw_catalog().await?;
        Ok(raw.into_iter().map(normalize_product).collect())
    }

    /// Fetches the catalog without normalizing it.
    ///
    /// Products that fail to deserialize individually are skipped with a
    /// warning; one bad record does not discard the catalog.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::Http`] on network failure or non-2xx status, after retries.
    /// - [`SupplierError::ApiError`] if the envelope reports `"success": false`.
    /// - [`SupplierError::Deserialize`] if the body is not JSON or `response`
    ///   is not a list.
    pub async fn fetch_raw_catalog(&self) -> Result<Vec<PromoProduct>, SupplierError> {
        let url = self.endpoint("all-products");
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;
        Self::check_api_error(&body)?;

        let items: Vec<serde_json::Value> = match body.get("response") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                SupplierError::Deserialize {
                    context: "all-products response list".to_owned(),
                    source: e,
                }
            })?,
        };

        let total = items.len();
        let products: Vec<PromoProduct> = items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, v)| {
                serde_json::from_value::<PromoProduct>(v)
                    .map_err(|e| {
                        tracing::warn!(index = idx, error = %e, "skipping malformed supplier product");
                    })
                    .ok()
            })
            .collect();

        tracing::info!(
            fetched = products.len(),
            skipped = total - products.len(),
            "fetched supplier catalog"
        );
        Ok(products)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.pop_if_empty().push(path);
        }
        url
    }

    /// POSTs the credentials, asserts a 2xx status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, SupplierError> {
        let payload = serde_json::json!({
            "user": self.user,
            "password": self.password,
        });
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SupplierError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Checks the envelope's `"success"` flag.
    fn check_api_error(body: &serde_json::Value) -> Result<(), SupplierError> {
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(true) {
            return Ok(());
        }
        let msg = body
            .get("respusta")
            .or_else(|| body.get("respuesta"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Unknown API error")
            .to_owned();
        Err(SupplierError::ApiError(msg))
    }
}

impl SupplierSource for PromoOpcionClient {
    async fn fetch_all_products(&self) -> Result<Vec<SupplierProduct>, SyncError> {
        self.fetch_catalog().await.map_err(SyncError::from)
    }
}
