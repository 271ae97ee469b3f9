//! [`DestinationSink`] over a live [`ShopifySession`].

use promosync_core::{
    DestinationProduct, DestinationSink, DestinationVariant, ProductDraft, SyncError, VariantRef,
};
use rust_decimal::Decimal;

use crate::session::ShopifySession;

impl DestinationSink for ShopifySession {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<VariantRef>, SyncError> {
        self.lookup_variant_by_sku(sku)
            .await
            .map_err(crate::error::ShopifyError::into_sync_error)
    }

    async fn get_variants_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<DestinationVariant>, SyncError> {
        self.product_variants(product_id)
            .await
            .map_err(crate::error::ShopifyError::into_sync_error)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<DestinationProduct, SyncError> {
        self.create_product_from_draft(draft)
            .await
            .map_err(|e| SyncError::operation(format!("product {}", draft.parent_sku), e))
    }

    async fn update_variant_price(
        &self,
        variant_id: i64,
        new_price: Decimal,
    ) -> Result<(), SyncError> {
        self.set_variant_price(variant_id, new_price)
            .await
            .map_err(|e| SyncError::operation(format!("variant {variant_id}"), e))
    }

    async fn delete_variant(&self, product_id: i64, variant_id: i64) -> Result<(), SyncError> {
        self.remove_variant(product_id, variant_id)
            .await
            .map_err(|e| SyncError::operation(format!("variant {variant_id}"), e))
    }

    fn close_session(&mut self) {
        self.close();
    }
}
