//! Variant reads and writes over the REST Admin API.

use promosync_core::DestinationVariant;
use reqwest::Method;
use rust_decimal::Decimal;

use crate::error::ShopifyError;
use crate::types::ProductEnvelope;

use super::{format_price, ShopifySession};

impl ShopifySession {
    /// Lists every variant of `product_id`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the product does not exist.
    /// - [`ShopifyError::Deserialize`] if the product body has an unexpected shape.
    /// - Any transport error from the request, after retries.
    pub async fn product_variants(
        &self,
        product_id: i64,
    ) -> Result<Vec<DestinationVariant>, ShopifyError> {
        let url = self.endpoint(&format!("products/{product_id}.json"))?;
        let body = self.send_json(Method::GET, &url, None, true).await?;
        let envelope: ProductEnvelope =
            serde_json::from_value(body).map_err(|e| ShopifyError::Deserialize {
                context: format!("product {product_id}"),
                source: e,
            })?;

        Ok(envelope
            .product
            .variants
            .into_iter()
            .map(|v| DestinationVariant {
                id: v.id,
                product_id: v.product_id,
                sku: v.sku.unwrap_or_default(),
                price: v.price,
            })
            .collect())
    }

    /// Sets the price of one variant, rounded to two decimals.
    ///
    /// A `PUT` of the same price is idempotent, so this call is retried on
    /// transient errors.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::UnexpectedStatus`] if Shopify rejects the update (e.g. 422).
    /// - Any transport error from the request, after retries.
    pub async fn set_variant_price(
        &self,
        variant_id: i64,
        new_price: Decimal,
    ) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!("variants/{variant_id}.json"))?;
        let price = format_price(new_price);
        let body = serde_json::json!({
            "variant": {
                "id": variant_id,
                "price": price,
            }
        });
        self.send_json(Method::PUT, &url, Some(&body), true).await?;
        tracing::info!(variant_id, price = %price, "updated variant price");
        Ok(())
    }

    /// Deletes one variant from its product. Sent once, never retried.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the variant or product is gone.
    /// - [`ShopifyError::UnexpectedStatus`] if Shopify refuses, e.g. when
    ///   removing the last variant of a product.
    pub async fn remove_variant(&self, product_id: i64, variant_id: i64) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!(
            "products/{product_id}/variants/{variant_id}.json"
        ))?;
        self.send_json(Method::DELETE, &url, None, false).await?;
        tracing::info!(product_id, variant_id, "deleted variant");
        Ok(())
    }
}
