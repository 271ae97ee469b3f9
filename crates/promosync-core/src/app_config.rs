use rust_decimal::Decimal;

/// What to do with a supplier variant whose base price is missing or does
/// not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidPricePolicy {
    /// Quote the variant at `0.00`.
    #[default]
    Zero,
    /// Leave the variant out of creates and never touch its price.
    Skip,
}

impl std::fmt::Display for InvalidPricePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidPricePolicy::Zero => write!(f, "zero"),
            InvalidPricePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Which storefront variants count as discontinued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InactiveVariantPolicy {
    /// Delete every storefront SKU that is not currently active at the supplier.
    #[default]
    Delete,
    /// Delete only storefront SKUs the supplier does not list at all;
    /// inactive supplier variants are left in place.
    Keep,
}

impl std::fmt::Display for InactiveVariantPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InactiveVariantPolicy::Delete => write!(f, "delete"),
            InactiveVariantPolicy::Keep => write!(f, "keep"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub promo_user: String,
    pub promo_password: String,
    pub promo_api_base_url: String,
    pub promo_request_timeout_secs: u64,
    pub shopify_url: String,
    pub shopify_token: String,
    pub shopify_api_version: String,
    pub shopify_request_timeout_secs: u64,
    pub shopify_lookup_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub discount_rate: Decimal,
    pub margin_rate: Decimal,
    pub price_tolerance: Decimal,
    pub invalid_price_policy: InvalidPricePolicy,
    pub inactive_variant_policy: InactiveVariantPolicy,
    pub vendor: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("promo_user", &self.promo_user)
            .field("promo_password", &"[redacted]")
            .field("promo_api_base_url", &self.promo_api_base_url)
            .field(
                "promo_request_timeout_secs",
                &self.promo_request_timeout_secs,
            )
            .field("shopify_url", &self.shopify_url)
            .field("shopify_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field(
                "shopify_request_timeout_secs",
                &self.shopify_request_timeout_secs,
            )
            .field("shopify_lookup_delay_ms", &self.shopify_lookup_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("discount_rate", &self.discount_rate)
            .field("margin_rate", &self.margin_rate)
            .field("price_tolerance", &self.price_tolerance)
            .field("invalid_price_policy", &self.invalid_price_policy)
            .field("inactive_variant_policy", &self.inactive_variant_policy)
            .field("vendor", &self.vendor)
            .finish()
    }
}
