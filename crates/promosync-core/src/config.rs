use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, InactiveVariantPolicy, InvalidPricePolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials have no fallback values: a missing `PROMO_USER`,
/// `PROMO_PASSWORD`, `SHOPIFY_URL`, or `SHOPIFY_TOKEN` fails immediately.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_rate = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let raw = or_default(var, default);
        let rate = Decimal::from_str(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if rate.is_sign_negative() || rate >= Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{rate} is outside [0, 1)"),
            });
        }
        Ok(rate)
    };

    let promo_user = require("PROMO_USER")?;
    let promo_password = require("PROMO_PASSWORD")?;
    let shopify_url = require("SHOPIFY_URL")?;
    let shopify_token = require("SHOPIFY_TOKEN")?;

    let log_level = or_default("PROMOSYNC_LOG_LEVEL", "info");
    let promo_api_base_url = or_default(
        "PROMO_API_BASE_URL",
        "https://promocionalesenlinea.net/api",
    );
    let promo_request_timeout_secs = parse_u64("PROMO_REQUEST_TIMEOUT_SECS", "120")?;
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-04");
    let shopify_request_timeout_secs = parse_u64("SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?;
    let shopify_lookup_delay_ms = parse_u64("SHOPIFY_LOOKUP_DELAY_MS", "1000")?;
    let max_retries = parse_u32("PROMOSYNC_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PROMOSYNC_RETRY_BACKOFF_BASE_MS", "1000")?;

    let discount_rate = parse_rate("PROMOSYNC_DISCOUNT_RATE", "0.23")?;
    let margin_rate = parse_rate("PROMOSYNC_MARGIN_RATE", "0.40")?;
    let price_tolerance = parse_tolerance(&or_default("PROMOSYNC_PRICE_TOLERANCE", "0.01"))?;
    let invalid_price_policy =
        parse_invalid_price_policy(&or_default("PROMOSYNC_INVALID_PRICE", "zero"))?;
    let inactive_variant_policy =
        parse_inactive_variant_policy(&or_default("PROMOSYNC_INACTIVE_VARIANTS", "delete"))?;
    let vendor = or_default("PROMOSYNC_VENDOR", "PromoOpción");

    Ok(AppConfig {
        log_level,
        promo_user,
        promo_password,
        promo_api_base_url,
        promo_request_timeout_secs,
        shopify_url,
        shopify_token,
        shopify_api_version,
        shopify_request_timeout_secs,
        shopify_lookup_delay_ms,
        max_retries,
        retry_backoff_base_ms,
        discount_rate,
        margin_rate,
        price_tolerance,
        invalid_price_policy,
        inactive_variant_policy,
        vendor,
    })
}

fn parse_tolerance(raw: &str) -> Result<Decimal, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "PROMOSYNC_PRICE_TOLERANCE".to_string(),
        reason,
    };
    let tolerance = Decimal::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if tolerance.is_sign_negative() {
        return Err(invalid(format!("{tolerance} is negative")));
    }
    Ok(tolerance)
}

fn parse_invalid_price_policy(s: &str) -> Result<InvalidPricePolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "zero" => Ok(InvalidPricePolicy::Zero),
        "skip" => Ok(InvalidPricePolicy::Skip),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROMOSYNC_INVALID_PRICE".to_string(),
            reason: format!("expected \"zero\" or \"skip\", got \"{other}\""),
        }),
    }
}

fn parse_inactive_variant_policy(s: &str) -> Result<InactiveVariantPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "delete" => Ok(InactiveVariantPolicy::Delete),
        "keep" => Ok(InactiveVariantPolicy::Keep),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROMOSYNC_INACTIVE_VARIANTS".to_string(),
            reason: format!("expected \"delete\" or \"keep\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
