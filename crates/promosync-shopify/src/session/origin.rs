//! Store URL handling for the Shopify Admin session.

use reqwest::Url;

use crate::error::ShopifyError;

/// Builds the Admin API base URL for a store.
///
/// Given `"promotienda-mx.myshopify.com"` and `"2024-04"`, returns
/// `https://promotienda-mx.myshopify.com/admin/api/2024-04/`. A missing scheme
/// defaults to `https://`; any path on the store URL is discarded.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidShopUrl`] if the store URL has no host or
/// `api_version` is blank.
pub fn admin_base_url(shop_url: &str, api_version: &str) -> Result<Url, ShopifyError> {
    let invalid = |reason: String| ShopifyError::InvalidShopUrl {
        shop_url: shop_url.to_owned(),
        reason,
    };

    let trimmed = shop_url.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host".to_owned()));
    }

    let api_version = api_version.trim();
    if api_version.is_empty() {
        return Err(invalid("API version is empty".to_owned()));
    }

    let origin = parsed.origin().ascii_serialization();
    Url::parse(&format!("{origin}/admin/api/{api_version}/")).map_err(|e| invalid(e.to_string()))
}

/// Extracts the hostname from a store URL for log fields.
///
/// Falls back to the input if parsing fails.
pub(super) fn extract_domain(base: &Url) -> String {
    base.host_str().map_or_else(|| base.to_string(), str::to_owned)
}
