//! Catalog records exchanged between the supplier, the reconciler, and the
//! storefront.
//!
//! Supplier records are read-only snapshots taken once per run. Destination
//! records reflect what the storefront reported at lookup time and are never
//! cached between runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a supplier variant is currently sellable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    Active,
    Inactive,
}

/// A parent product from the supplier catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProduct {
    pub parent_sku: String,
    pub name: String,
    /// Raw HTML description as sent by the supplier.
    pub description: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    /// Parent-level image URLs, in supplier order.
    pub parent_images: Vec<String>,
    /// Child variants, in supplier order.
    pub children: Vec<SupplierVariant>,
}

impl SupplierProduct {
    /// Iterates the children whose status is [`VariantStatus::Active`].
    pub fn active_children(&self) -> impl Iterator<Item = &SupplierVariant> {
        self.children.iter().filter(|v| v.is_active())
    }
}

/// A purchasable child of a [`SupplierProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierVariant {
    /// Globally unique across the catalog; the join key against the storefront.
    pub sku: String,
    pub color: Option<String>,
    /// Supplier unit price. `None` when the supplier omitted it or sent a
    /// value that does not parse as a decimal.
    pub base_price: Option<Decimal>,
    pub status: VariantStatus,
    pub child_images: Vec<String>,
}

impl SupplierVariant {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }
}

/// A variant as it currently exists in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationVariant {
    pub id: i64,
    pub product_id: i64,
    /// Empty when the storefront variant carries no SKU.
    pub sku: String,
    pub price: Decimal,
}

/// A product as it currently exists in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationProduct {
    pub id: i64,
    pub title: String,
    pub variants: Vec<DestinationVariant>,
}

/// Result of a point lookup by SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRef {
    pub variant_id: i64,
    pub product_id: i64,
    pub price: Decimal,
}

/// Payload for creating a new storefront product.
///
/// Prices are already rounded to two decimal places and images are already
/// deduplicated; sinks transmit the draft as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Supplier parent SKU this draft was built from. Not transmitted.
    pub parent_sku: String,
    pub title: String,
    pub body_html: Option<String>,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub variants: Vec<VariantDraft>,
    pub images: Vec<String>,
}

/// One variant inside a [`ProductDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDraft {
    pub sku: String,
    /// Used as the variant's first option value.
    pub color: Option<String>,
    pub price: Decimal,
}
