//! Per-product reconciliation: supplier state vs. storefront state.
//!
//! [`Reconciler::plan_product`] performs the read-only lookups and returns a
//! [`ProductPlan`]; [`Reconciler::apply_plan`] sends the plan's operations to
//! the sink. Splitting the two lets a dry run stop after planning.
//!
//! SKU is the join key. The first active supplier SKU is the probe: if the
//! storefront does not know it, the whole product is created; otherwise the
//! storefront product it belongs to is diffed variant by variant.

use indexmap::{IndexMap, IndexSet};
use promosync_core::{
    AppConfig, DestinationSink, DestinationVariant, InactiveVariantPolicy, ProductDraft,
    SupplierProduct, SupplierVariant, SyncError, VariantDraft,
};
use rust_decimal::Decimal;

use crate::error::PricingError;
use crate::pricing::PricingPolicy;

/// Product type used when the supplier sends no sub-category.
const DEFAULT_PRODUCT_TYPE: &str = "General";

/// Knobs that shape what a plan contains.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub pricing: PricingPolicy,
    /// Differences at or below this amount do not trigger a price update.
    pub price_tolerance: Decimal,
    pub inactive_variants: InactiveVariantPolicy,
    /// Vendor set on created products.
    pub vendor: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            price_tolerance: Decimal::new(1, 2),
            inactive_variants: InactiveVariantPolicy::Delete,
            vendor: "PromoOpción".to_owned(),
        }
    }
}

impl ReconcileOptions {
    /// # Errors
    ///
    /// Returns [`PricingError`] if the configured rates or tolerance are out
    /// of range.
    pub fn from_config(config: &AppConfig) -> Result<Self, PricingError> {
        if config.price_tolerance < Decimal::ZERO {
            return Err(PricingError::NegativeTolerance(
                config.price_tolerance.to_string(),
            ));
        }
        Ok(Self {
            pricing: PricingPolicy::from_config(config)?,
            price_tolerance: config.price_tolerance,
            inactive_variants: config.inactive_variant_policy,
            vendor: config.vendor.clone(),
        })
    }
}

/// One storefront mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateProduct(ProductDraft),
    UpdatePrice {
        variant_id: i64,
        sku: String,
        old_price: Decimal,
        new_price: Decimal,
    },
    DeleteVariant {
        product_id: i64,
        variant_id: i64,
        sku: String,
    },
}

impl Operation {
    /// Short label for logs and failure records.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Operation::CreateProduct(draft) => format!("create product {}", draft.parent_sku),
            Operation::UpdatePrice {
                sku, new_price, ..
            } => format!("update {sku} to {new_price}"),
            Operation::DeleteVariant { sku, variant_id, .. } => {
                format!("delete {sku} (variant {variant_id})")
            }
        }
    }
}

/// Why a product produced no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveVariants,
    /// Every active variant lacks a usable price and the invalid-price
    /// policy is `skip`.
    NoPricedVariants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Skipped(SkipReason),
    Create,
    Existing { product_id: i64 },
}

/// Operations computed for one supplier product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPlan {
    pub parent_sku: String,
    pub name: String,
    pub kind: PlanKind,
    pub operations: Vec<Operation>,
}

impl ProductPlan {
    fn skipped(product: &SupplierProduct, reason: SkipReason) -> Self {
        Self {
            parent_sku: product.parent_sku.clone(),
            name: product.name.clone(),
            kind: PlanKind::Skipped(reason),
            operations: Vec::new(),
        }
    }

    /// `true` for an existing product that already matches the supplier.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self.kind, PlanKind::Existing { .. }) && self.operations.is_empty()
    }
}

/// Tally of one [`Reconciler::apply_plan`] call.
#[derive(Debug, Default)]
pub struct ApplyResult {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Failed operations with their description.
    pub failures: Vec<(String, SyncError)>,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    options: ReconcileOptions,
}

impl Reconciler {
    #[must_use]
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Computes the operations that bring the storefront in line with
    /// `product`. Only reads from `sink`.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the probe lookup or the variant listing
    /// fails. The caller decides whether that ends the run.
    pub async fn plan_product<S>(
        &self,
        product: &SupplierProduct,
        sink: &S,
    ) -> Result<ProductPlan, SyncError>
    where
        S: DestinationSink + ?Sized,
    {
        let active = active_variants(product);
        let Some(probe_sku) = active.keys().next().copied() else {
            tracing::info!(parent_sku = %product.parent_sku, "skipping product: no active variants");
            return Ok(ProductPlan::skipped(product, SkipReason::NoActiveVariants));
        };

        let Some(found) = sink.find_variant_by_sku(probe_sku).await? else {
            let draft = build_draft(product, &active, &self.options);
            if draft.variants.is_empty() {
                tracing::warn!(
                    parent_sku = %product.parent_sku,
                    "skipping product: no active variant has a usable price"
                );
                return Ok(ProductPlan::skipped(product, SkipReason::NoPricedVariants));
            }
            return Ok(ProductPlan {
                parent_sku: product.parent_sku.clone(),
                name: product.name.clone(),
                kind: PlanKind::Create,
                operations: vec![Operation::CreateProduct(draft)],
            });
        };

        let destination = sink.get_variants_for_product(found.product_id).await?;
        let mut operations = self.price_updates(product, &active, &destination);
        operations.extend(self.deletions(product, &active, &destination));

        Ok(ProductPlan {
            parent_sku: product.parent_sku.clone(),
            name: product.name.clone(),
            kind: PlanKind::Existing {
                product_id: found.product_id,
            },
            operations,
        })
    }

    /// Sends every operation in `plan` to `sink`, in order.
    ///
    /// A failed operation is logged and recorded; the remaining operations
    /// still run.
    pub async fn apply_plan<S>(&self, plan: &ProductPlan, sink: &S) -> ApplyResult
    where
        S: DestinationSink + ?Sized,
    {
        let mut result = ApplyResult::default();

        for operation in &plan.operations {
            let outcome = match operation {
                Operation::CreateProduct(draft) => sink.create_product(draft).await.map(|created| {
                    tracing::info!(
                        parent_sku = %plan.parent_sku,
                        product_id = created.id,
                        variants = created.variants.len(),
                        "product created"
                    );
                    result.created += 1;
                }),
                Operation::UpdatePrice {
                    variant_id,
                    sku,
                    old_price,
                    new_price,
                } => sink
                    .update_variant_price(*variant_id, *new_price)
                    .await
                    .map(|()| {
                        tracing::info!(
                            parent_sku = %plan.parent_sku,
                            sku = %sku,
                            old_price = %old_price,
                            new_price = %new_price,
                            "variant price updated"
                        );
                        result.updated += 1;
                    }),
                Operation::DeleteVariant {
                    product_id,
                    variant_id,
                    sku,
                } => sink
                    .delete_variant(*product_id, *variant_id)
                    .await
                    .map(|()| {
                        tracing::info!(
                            parent_sku = %plan.parent_sku,
                            sku = %sku,
                            variant_id,
                            "discontinued variant deleted"
                        );
                        result.deleted += 1;
                    }),
            };

            if let Err(error) = outcome {
                let description = operation.describe();
                tracing::warn!(
                    parent_sku = %plan.parent_sku,
                    operation = %description,
                    error = %error,
                    "operation failed"
                );
                result.failures.push((description, error));
            }
        }

        result
    }

    fn price_updates(
        &self,
        product: &SupplierProduct,
        active: &IndexMap<&str, &SupplierVariant>,
        destination: &[DestinationVariant],
    ) -> Vec<Operation> {
        let by_sku: IndexMap<&str, &DestinationVariant> =
            destination.iter().map(|v| (v.sku.as_str(), v)).collect();

        let mut operations = Vec::new();
        for (sku, variant) in active {
            let Some(current) = by_sku.get(sku) else {
                continue;
            };
            let Some(quote) = self.options.pricing.quote(variant.base_price) else {
                tracing::debug!(
                    parent_sku = %product.parent_sku,
                    sku = %sku,
                    "no usable supplier price, leaving storefront price"
                );
                continue;
            };
            if (quote - current.price).abs() > self.options.price_tolerance {
                operations.push(Operation::UpdatePrice {
                    variant_id: current.id,
                    sku: (*sku).to_owned(),
                    old_price: current.price,
                    new_price: quote,
                });
            }
        }
        operations
    }

    fn deletions(
        &self,
        product: &SupplierProduct,
        active: &IndexMap<&str, &SupplierVariant>,
        destination: &[DestinationVariant],
    ) -> Vec<Operation> {
        let keep: IndexSet<&str> = match self.options.inactive_variants {
            InactiveVariantPolicy::Delete => active.keys().copied().collect(),
            InactiveVariantPolicy::Keep => {
                product.children.iter().map(|v| v.sku.as_str()).collect()
            }
        };

        destination
            .iter()
            .filter(|v| !keep.contains(v.sku.as_str()))
            .map(|v| Operation::DeleteVariant {
                product_id: v.product_id,
                variant_id: v.id,
                sku: v.sku.clone(),
            })
            .collect()
    }
}

/// Active children keyed by SKU, in order of first appearance. A repeated
/// SKU keeps its first position and takes the later record.
fn active_variants(product: &SupplierProduct) -> IndexMap<&str, &SupplierVariant> {
    product
        .active_children()
        .map(|v| (v.sku.as_str(), v))
        .collect()
}

/// Builds the create payload from the active variants of `product`.
///
/// Variants without a usable price are left out under the `skip`
/// invalid-price policy. Images are the parent images followed by the active
/// children's images, with exact duplicates dropped at their later position.
pub(crate) fn build_draft(
    product: &SupplierProduct,
    active: &IndexMap<&str, &SupplierVariant>,
    options: &ReconcileOptions,
) -> ProductDraft {
    let variants = active
        .values()
        .filter_map(|variant| {
            let price = options.pricing.quote(variant.base_price)?;
            Some(VariantDraft {
                sku: variant.sku.clone(),
                color: variant.color.clone(),
                price,
            })
        })
        .collect();

    let images: IndexSet<&str> = product
        .parent_images
        .iter()
        .chain(active.values().flat_map(|v| v.child_images.iter()))
        .map(String::as_str)
        .collect();

    let tags = [&product.category, &product.sub_category]
        .into_iter()
        .flatten()
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .collect();

    ProductDraft {
        parent_sku: product.parent_sku.clone(),
        title: product.name.clone(),
        body_html: product.description.clone(),
        vendor: options.vendor.clone(),
        product_type: product
            .sub_category
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_TYPE.to_owned()),
        tags,
        variants,
        images: images.into_iter().map(str::to_owned).collect(),
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
