//! Interfaces to the two remote systems a sync run talks to.
//!
//! The reconciler never sees an HTTP client; it only drives these traits.
//! Production implementations live in `promosync-supplier` and
//! `promosync-shopify`.

use std::future::Future;

use rust_decimal::Decimal;

use crate::catalog::{
    DestinationProduct, DestinationVariant, ProductDraft, SupplierProduct, VariantRef,
};
use crate::error::SyncError;

/// Upstream catalog provider.
pub trait SupplierSource {
    /// Fetches the complete supplier catalog in supplier order.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Transport`] on network or HTTP failure.
    /// - [`SyncError::Api`] when the supplier reports failure or the payload
    ///   cannot be parsed.
    fn fetch_all_products(
        &self,
    ) -> impl Future<Output = Result<Vec<SupplierProduct>, SyncError>> + Send;
}

/// Storefront catalog that receives the reconciled products.
///
/// Implementors hold an open session. All catalog calls borrow the session
/// immutably; only [`DestinationSink::close_session`] needs exclusive access.
pub trait DestinationSink {
    /// Point lookup of a variant by SKU.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] or [`SyncError::Api`] if the lookup itself fails.
    /// An unknown SKU is `Ok(None)`, not an error.
    fn find_variant_by_sku(
        &self,
        sku: &str,
    ) -> impl Future<Output = Result<Option<VariantRef>, SyncError>> + Send;

    /// Lists every variant belonging to `product_id`.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] or [`SyncError::Api`] if the product cannot be read.
    fn get_variants_for_product(
        &self,
        product_id: i64,
    ) -> impl Future<Output = Result<Vec<DestinationVariant>, SyncError>> + Send;

    /// Creates a product with all variants and images in `draft`.
    ///
    /// # Errors
    ///
    /// [`SyncError::OperationFailure`] if the storefront rejects the product.
    fn create_product(
        &self,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<DestinationProduct, SyncError>> + Send;

    /// Sets the price of one variant. `new_price` is sent as given.
    ///
    /// # Errors
    ///
    /// [`SyncError::OperationFailure`] if the update is rejected.
    fn update_variant_price(
        &self,
        variant_id: i64,
        new_price: Decimal,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Deletes one variant from its product.
    ///
    /// # Errors
    ///
    /// [`SyncError::OperationFailure`] if the delete is rejected.
    fn delete_variant(
        &self,
        product_id: i64,
        variant_id: i64,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Releases session state. Must be idempotent.
    fn close_session(&mut self);
}
