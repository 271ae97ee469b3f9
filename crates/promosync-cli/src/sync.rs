//! `sync` command: wire the clients from config and run the engine.

use promosync_core::AppConfig;
use promosync_shopify::ShopifySession;
use promosync_supplier::PromoOpcionClient;
use promosync_sync::{run_full_sync, ReconcileOptions, Reconciler, SyncOptions};

pub(crate) fn build_supplier_client(config: &AppConfig) -> anyhow::Result<PromoOpcionClient> {
    PromoOpcionClient::with_base_url(
        &config.promo_user,
        &config.promo_password,
        config.promo_request_timeout_secs,
        &config.promo_api_base_url,
    )
    .map(|client| client.with_retry(config.max_retries, config.retry_backoff_base_ms))
    .map_err(|e| anyhow::anyhow!("failed to build PromoOpción client: {e}"))
}

pub(crate) fn open_shopify_session(config: &AppConfig) -> anyhow::Result<ShopifySession> {
    ShopifySession::open(
        &config.shopify_url,
        &config.shopify_token,
        &config.shopify_api_version,
        config.shopify_request_timeout_secs,
    )
    .map(|session| {
        session
            .with_lookup_delay(config.shopify_lookup_delay_ms)
            .with_retry(config.max_retries, config.retry_backoff_base_ms)
    })
    .map_err(|e| anyhow::anyhow!("failed to open Shopify session: {e}"))
}

/// Runs one sync and prints its report.
///
/// Per-product failures are listed in the report; only a failed catalog fetch
/// or bad configuration makes this return an error.
pub(crate) async fn run_sync(
    config: &AppConfig,
    limit: Option<usize>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(ReconcileOptions::from_config(config)?);
    let supplier = build_supplier_client(config)?;
    let mut session = open_shopify_session(config)?;

    let report = run_full_sync(
        &supplier,
        &mut session,
        &reconciler,
        SyncOptions { limit, dry_run },
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    if !report.is_clean() {
        tracing::warn!(
            products_failed = report.products_failed,
            operations_failed = report.operations_failed,
            "sync finished with failures"
        );
    }
    Ok(())
}
