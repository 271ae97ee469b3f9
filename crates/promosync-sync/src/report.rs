//! Summary of one sync run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::reconcile::{ApplyResult, PlanKind, ProductPlan};

/// Where a product failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The probe lookup or the variant listing failed; nothing was sent.
    Lookup,
    /// A create, update, or delete was rejected.
    Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFailure {
    pub parent_sku: String,
    pub stage: FailureStage,
    /// Operation that failed, when `stage` is [`FailureStage::Operation`].
    pub operation: Option<String>,
    pub message: String,
}

/// Counts and failures for one run.
///
/// In a dry run the created, updated, and deleted counts are the planned
/// operations; nothing was sent to the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Products fetched from the supplier, before any limit.
    pub catalog_size: usize,
    pub products_seen: usize,
    pub products_created: usize,
    pub variants_updated: usize,
    pub variants_deleted: usize,
    pub products_unchanged: usize,
    pub products_skipped: usize,
    pub products_failed: usize,
    pub operations_failed: usize,
    pub failures: Vec<ProductFailure>,
}

impl SyncReport {
    pub(crate) fn start(run_id: Uuid, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            started_at: now,
            finished_at: now,
            dry_run,
            catalog_size: 0,
            products_seen: 0,
            products_created: 0,
            variants_updated: 0,
            variants_deleted: 0,
            products_unchanged: 0,
            products_skipped: 0,
            products_failed: 0,
            operations_failed: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub(crate) fn record_lookup_failure(&mut self, parent_sku: &str, message: String) {
        self.products_failed += 1;
        self.failures.push(ProductFailure {
            parent_sku: parent_sku.to_owned(),
            stage: FailureStage::Lookup,
            operation: None,
            message,
        });
    }

    /// Counts the plan's kind. Operation counts come from
    /// [`Self::record_applied`] or [`Self::record_planned`].
    pub(crate) fn record_plan(&mut self, plan: &ProductPlan) {
        match plan.kind {
            PlanKind::Skipped(_) => self.products_skipped += 1,
            PlanKind::Existing { .. } if plan.operations.is_empty() => {
                self.products_unchanged += 1;
            }
            PlanKind::Create | PlanKind::Existing { .. } => {}
        }
    }

    /// Counts a plan that was not sent (dry run).
    pub(crate) fn record_planned(&mut self, plan: &ProductPlan) {
        use crate::reconcile::Operation;

        for operation in &plan.operations {
            match operation {
                Operation::CreateProduct(_) => self.products_created += 1,
                Operation::UpdatePrice { .. } => self.variants_updated += 1,
                Operation::DeleteVariant { .. } => self.variants_deleted += 1,
            }
        }
    }

    pub(crate) fn record_applied(&mut self, parent_sku: &str, result: ApplyResult) {
        self.products_created += result.created;
        self.variants_updated += result.updated;
        self.variants_deleted += result.deleted;

        if result.failures.is_empty() {
            return;
        }
        self.products_failed += 1;
        self.operations_failed += result.failures.len();
        for (operation, error) in result.failures {
            self.failures.push(ProductFailure {
                parent_sku: parent_sku.to_owned(),
                stage: FailureStage::Operation,
                operation: Some(operation),
                message: error.to_string(),
            });
        }
    }

    /// `true` when every product was reconciled without error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn duration(&self) -> chrono::TimeDelta {
        self.finished_at - self.started_at
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(f, "sync run {}{mode}", self.run_id)?;
        writeln!(
            f,
            "  products: {} of {} processed, {} created, {} unchanged, {} skipped, {} failed",
            self.products_seen,
            self.catalog_size,
            self.products_created,
            self.products_unchanged,
            self.products_skipped,
            self.products_failed,
        )?;
        writeln!(
            f,
            "  variants: {} price updates, {} deletions, {} failed operations",
            self.variants_updated, self.variants_deleted, self.operations_failed,
        )?;
        write!(f, "  duration: {}s", self.duration().num_seconds())?;
        for failure in &self.failures {
            write!(f, "\n  failed {}", failure.parent_sku)?;
            if let Some(operation) = &failure.operation {
                write!(f, " [{operation}]")?;
            }
            write!(f, ": {}", failure.message)?;
        }
        Ok(())
    }
}
