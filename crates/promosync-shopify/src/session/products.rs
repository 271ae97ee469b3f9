//! Product creation over the REST Admin API.

use promosync_core::{DestinationProduct, DestinationVariant, ProductDraft};
use reqwest::Method;

use crate::error::ShopifyError;
use crate::types::{NewImage, NewOption, NewProduct, NewProductEnvelope, NewVariant, ProductEnvelope};

use super::{format_price, ShopifySession};

impl ShopifySession {
    /// Creates a product with every variant and image in `draft`.
    ///
    /// The request is sent once. A failed create may still have reached the
    /// store, and a blind retry could duplicate the product.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::UnexpectedStatus`] if Shopify rejects the product (e.g. 422).
    /// - [`ShopifyError::Deserialize`] if the created product cannot be read back.
    /// - Any transport error from the request.
    pub async fn create_product_from_draft(
        &self,
        draft: &ProductDraft,
    ) -> Result<DestinationProduct, ShopifyError> {
        let url = self.endpoint("products.json")?;
        let body = serde_json::to_value(NewProductEnvelope {
            product: new_product(draft),
        })
        .map_err(|e| ShopifyError::Deserialize {
            context: format!("new product {}", draft.parent_sku),
            source: e,
        })?;

        let response = self.send_json(Method::POST, &url, Some(&body), false).await?;
        let envelope: ProductEnvelope =
            serde_json::from_value(response).map_err(|e| ShopifyError::Deserialize {
                context: format!("created product {}", draft.parent_sku),
                source: e,
            })?;

        let product = envelope.product;
        tracing::info!(
            parent_sku = %draft.parent_sku,
            product_id = product.id,
            variants = product.variants.len(),
            "created product"
        );

        Ok(DestinationProduct {
            id: product.id,
            title: product.title,
            variants: product
                .variants
                .into_iter()
                .map(|v| DestinationVariant {
                    id: v.id,
                    product_id: v.product_id,
                    sku: v.sku.unwrap_or_default(),
                    price: v.price,
                })
                .collect(),
        })
    }
}

/// Maps a draft onto the REST create payload.
///
/// Each variant's color is its option value; a variant without a color falls
/// back to its SKU so option values stay unique within the product.
pub(crate) fn new_product(draft: &ProductDraft) -> NewProduct<'_> {
    NewProduct {
        title: &draft.title,
        body_html: draft.body_html.as_deref(),
        vendor: &draft.vendor,
        product_type: &draft.product_type,
        tags: draft.tags.join(", "),
        options: vec![NewOption { name: "Color" }],
        variants: draft
            .variants
            .iter()
            .map(|v| NewVariant {
                option1: v.color.as_deref().unwrap_or(&v.sku),
                price: format_price(v.price),
                sku: &v.sku,
                inventory_management: "shopify",
            })
            .collect(),
        images: draft.images.iter().map(|src| NewImage { src }).collect(),
    }
}
