//! Full-catalog sync run.

use std::ops::Deref;

use promosync_core::{DestinationSink, SupplierSource, SyncError};
use tracing::Instrument;
use uuid::Uuid;

use crate::reconcile::Reconciler;
use crate::report::SyncReport;

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Process only the first `limit` products, in supplier order.
    pub limit: Option<usize>,
    /// Plan every product but send nothing to the storefront.
    pub dry_run: bool,
}

/// Closes the wrapped sink's session when dropped.
///
/// Holding the guard for the whole run releases the session exactly once on
/// every exit path: success, early `?` return, or panic.
pub struct SessionGuard<'a, S: DestinationSink> {
    sink: &'a mut S,
}

impl<'a, S: DestinationSink> SessionGuard<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }
}

impl<S: DestinationSink> Deref for SessionGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: DestinationSink> Drop for SessionGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.close_session();
    }
}

/// Runs one sync: fetch the catalog once, then reconcile each product in
/// supplier order.
///
/// Failures while reconciling a product are recorded in the report and the
/// run moves on. The sink's session is closed before this returns, whatever
/// the outcome.
///
/// # Errors
///
/// Returns the source's error if the catalog cannot be fetched.
pub async fn run_full_sync<Src, S>(
    source: &Src,
    sink: &mut S,
    reconciler: &Reconciler,
    options: SyncOptions,
) -> Result<SyncReport, SyncError>
where
    Src: SupplierSource,
    S: DestinationSink,
{
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("sync_run", %run_id, dry_run = options.dry_run);

    async move {
        let session = SessionGuard::new(sink);
        let mut report = SyncReport::start(run_id, options.dry_run);

        tracing::info!("fetching supplier catalog");
        let catalog = match source.fetch_all_products().await {
            Ok(catalog) => catalog,
            Err(error) => {
                tracing::error!(error = %error, "catalog fetch failed, aborting run");
                return Err(error);
            }
        };
        report.catalog_size = catalog.len();

        let take = options.limit.unwrap_or(catalog.len()).min(catalog.len());
        if take < catalog.len() {
            tracing::info!(limit = take, total = catalog.len(), "processing a prefix of the catalog");
        } else {
            tracing::info!(total = catalog.len(), "processing full catalog");
        }

        for (index, product) in catalog.iter().take(take).enumerate() {
            report.products_seen += 1;
            tracing::info!(
                position = index + 1,
                of = take,
                parent_sku = %product.parent_sku,
                name = %product.name,
                "reconciling product"
            );

            let plan = match reconciler.plan_product(product, &*session).await {
                Ok(plan) => plan,
                Err(error) => {
                    tracing::warn!(
                        parent_sku = %product.parent_sku,
                        error = %error,
                        "lookup failed, skipping product"
                    );
                    report.record_lookup_failure(&product.parent_sku, error.to_string());
                    continue;
                }
            };
            report.record_plan(&plan);

            if options.dry_run {
                for operation in &plan.operations {
                    tracing::info!(
                        parent_sku = %plan.parent_sku,
                        operation = %operation.describe(),
                        "planned"
                    );
                }
                report.record_planned(&plan);
            } else {
                let result = reconciler.apply_plan(&plan, &*session).await;
                report.record_applied(&plan.parent_sku, result);
            }
        }

        report.finish();
        tracing::info!(
            products_seen = report.products_seen,
            products_created = report.products_created,
            variants_updated = report.variants_updated,
            variants_deleted = report.variants_deleted,
            products_unchanged = report.products_unchanged,
            products_skipped = report.products_skipped,
            products_failed = report.products_failed,
            operations_failed = report.operations_failed,
            "sync run finished"
        );
        drop(session);
        Ok(report)
    }
    .instrument(span)
    .await
}
