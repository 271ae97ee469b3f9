//! In-memory `SupplierSource` and `DestinationSink` fakes.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use promosync_core::{
    DestinationProduct, DestinationSink, DestinationVariant, ProductDraft, SupplierProduct,
    SupplierSource, SupplierVariant, SyncError, VariantRef, VariantStatus,
};
use rust_decimal::Decimal;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn active(sku: &str, price: &str) -> SupplierVariant {
    SupplierVariant {
        sku: sku.to_owned(),
        color: Some(format!("color-{sku}")),
        base_price: Some(dec(price)),
        status: VariantStatus::Active,
        child_images: Vec::new(),
    }
}

pub fn inactive(sku: &str, price: &str) -> SupplierVariant {
    SupplierVariant {
        status: VariantStatus::Inactive,
        ..active(sku, price)
    }
}

pub fn supplier_product(parent_sku: &str, children: Vec<SupplierVariant>) -> SupplierProduct {
    SupplierProduct {
        parent_sku: parent_sku.to_owned(),
        name: format!("Product {parent_sku}"),
        description: None,
        category: Some("BEBIDAS".to_owned()),
        sub_category: Some("VASOS".to_owned()),
        parent_images: Vec::new(),
        children,
    }
}

// ---------------------------------------------------------------------------
// Supplier
// ---------------------------------------------------------------------------

pub struct FakeSupplier {
    products: Vec<SupplierProduct>,
    fail: bool,
    pub fetches: AtomicUsize,
}

impl FakeSupplier {
    pub fn with_products(products: Vec<SupplierProduct>) -> Self {
        Self {
            products,
            fail: false,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            products: Vec::new(),
            fail: true,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl SupplierSource for FakeSupplier {
    async fn fetch_all_products(&self) -> Result<Vec<SupplierProduct>, SyncError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SyncError::Transport("connection refused".to_owned()));
        }
        Ok(self.products.clone())
    }
}

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

/// A call the store received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Lookup(String),
    ListVariants(i64),
    Create(String),
    UpdatePrice(i64, Decimal),
    Delete(i64, i64),
}

#[derive(Default)]
struct StoreState {
    products: Vec<DestinationProduct>,
    next_id: i64,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
    pub fail_lookup: HashSet<String>,
    pub fail_list: HashSet<i64>,
    pub fail_create: HashSet<String>,
    pub fail_update: HashSet<i64>,
    pub fail_delete: HashSet<i64>,
    pub closes: usize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1_000,
                ..StoreState::default()
            }),
            ..Self::default()
        }
    }

    /// Seeds a product whose variants are `(variant_id, sku, price)`.
    pub fn with_product(self, product_id: i64, variants: &[(i64, &str, &str)]) -> Self {
        self.state.lock().unwrap().products.push(DestinationProduct {
            id: product_id,
            title: format!("Stored {product_id}"),
            variants: variants
                .iter()
                .map(|(id, sku, price)| DestinationVariant {
                    id: *id,
                    product_id,
                    sku: (*sku).to_owned(),
                    price: dec(price),
                })
                .collect(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create(_) | Call::UpdatePrice(..) | Call::Delete(..)))
            .collect()
    }

    pub fn products(&self) -> Vec<DestinationProduct> {
        self.state.lock().unwrap().products.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl DestinationSink for FakeStore {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<VariantRef>, SyncError> {
        self.record(Call::Lookup(sku.to_owned()));
        if self.fail_lookup.contains(sku) {
            return Err(SyncError::Transport(format!("lookup of {sku} timed out")));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .flat_map(|p| p.variants.iter())
            .find(|v| v.sku == sku)
            .map(|v| VariantRef {
                variant_id: v.id,
                product_id: v.product_id,
                price: v.price,
            }))
    }

    async fn get_variants_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<DestinationVariant>, SyncError> {
        self.record(Call::ListVariants(product_id));
        if self.fail_list.contains(&product_id) {
            return Err(SyncError::Api(format!("product {product_id} unreadable")));
        }
        let state = self.state.lock().unwrap();
        state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.variants.clone())
            .ok_or_else(|| SyncError::Transport(format!("product {product_id} not found")))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<DestinationProduct, SyncError> {
        self.record(Call::Create(draft.parent_sku.clone()));
        if self.fail_create.contains(&draft.parent_sku) {
            return Err(SyncError::operation(
                format!("product {}", draft.parent_sku),
                "422 Unprocessable Entity",
            ));
        }
        let mut state = self.state.lock().unwrap();
        let product_id = state.next_id;
        state.next_id += 100;
        let product = DestinationProduct {
            id: product_id,
            title: draft.title.clone(),
            variants: draft
                .variants
                .iter()
                .zip(1..)
                .map(|(v, n)| DestinationVariant {
                    id: product_id + n,
                    product_id,
                    sku: v.sku.clone(),
                    price: v.price,
                })
                .collect(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_variant_price(
        &self,
        variant_id: i64,
        new_price: Decimal,
    ) -> Result<(), SyncError> {
        self.record(Call::UpdatePrice(variant_id, new_price));
        if self.fail_update.contains(&variant_id) {
            return Err(SyncError::operation(
                format!("variant {variant_id}"),
                "500 Internal Server Error",
            ));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(v) = state
            .products
            .iter_mut()
            .flat_map(|p| p.variants.iter_mut())
            .find(|v| v.id == variant_id)
        {
            v.price = new_price;
        }
        Ok(())
    }

    async fn delete_variant(&self, product_id: i64, variant_id: i64) -> Result<(), SyncError> {
        self.record(Call::Delete(product_id, variant_id));
        if self.fail_delete.contains(&variant_id) {
            return Err(SyncError::operation(
                format!("variant {variant_id}"),
                "404 Not Found",
            ));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(p) = state.products.iter_mut().find(|p| p.id == product_id) {
            p.variants.retain(|v| v.id != variant_id);
        }
        Ok(())
    }

    fn close_session(&mut self) {
        self.closes += 1;
    }
}
