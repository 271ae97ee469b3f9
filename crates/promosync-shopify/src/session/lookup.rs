//! SKU point lookup over the Admin GraphQL API.

use std::time::Duration;

use promosync_core::VariantRef;
use reqwest::Method;

use crate::error::ShopifyError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{GraphQlResponse, VariantLookupData};

use super::ShopifySession;

const FIND_VARIANT_BY_SKU: &str = r"query findVariantBySku($query: String!) {
  productVariants(first: 5, query: $query) {
    edges {
      node {
        id
        sku
        price
        product {
          id
        }
      }
    }
  }
}";

impl ShopifySession {
    /// Finds the variant whose SKU equals `sku` exactly.
    ///
    /// Sleeps for the configured lookup delay first. Shopify's search may
    /// return near matches; only an exact SKU match counts as found.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::GraphQl`] if the response carries GraphQL errors.
    /// - [`ShopifyError::MalformedResponse`] if an ID is not a Shopify GID.
    /// - Any transport error from the request, after retries.
    pub async fn lookup_variant_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<VariantRef>, ShopifyError> {
        if self.lookup_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.lookup_delay_ms)).await;
        }

        let request = serde_json::json!({
            "query": FIND_VARIANT_BY_SKU,
            "variables": { "query": sku_search_query(sku) },
        });
        let data: VariantLookupData = self.graphql(&request, "productVariants").await?;

        let Some(node) = data
            .product_variants
            .edges
            .into_iter()
            .map(|edge| edge.node)
            .find(|node| node.sku.as_deref() == Some(sku))
        else {
            tracing::debug!(sku, "no storefront variant for SKU");
            return Ok(None);
        };

        let found = VariantRef {
            variant_id: parse_gid(&node.id)?,
            product_id: parse_gid(&node.product.id)?,
            price: node.price,
        };
        tracing::debug!(
            sku,
            variant_id = found.variant_id,
            product_id = found.product_id,
            price = %found.price,
            "found storefront variant"
        );
        Ok(Some(found))
    }

    /// Runs a GraphQL request and unwraps `data`.
    ///
    /// A `THROTTLED` error is reported as [`ShopifyError::RateLimited`] so the
    /// backoff loop retries it.
    async fn graphql<T>(
        &self,
        request: &serde_json::Value,
        context: &str,
    ) -> Result<T, ShopifyError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint("graphql.json")?;
        let url = &url;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let body = self.send_once(Method::POST, url, Some(request)).await?;
            let envelope: GraphQlResponse<T> =
                serde_json::from_value(body).map_err(|e| ShopifyError::Deserialize {
                    context: format!("GraphQL {context}"),
                    source: e,
                })?;

            let throttled = envelope.errors.iter().any(|e| {
                e.extensions.as_ref().and_then(|x| x.code.as_deref()) == Some("THROTTLED")
            });
            if throttled {
                return Err(ShopifyError::RateLimited {
                    retry_after_secs: 1,
                });
            }
            if !envelope.errors.is_empty() {
                let messages: Vec<&str> =
                    envelope.errors.iter().map(|e| e.message.as_str()).collect();
                return Err(ShopifyError::GraphQl(messages.join("; ")));
            }

            envelope.data.ok_or_else(|| ShopifyError::MalformedResponse {
                context: format!("GraphQL {context}"),
                reason: "response has neither data nor errors".to_owned(),
            })
        })
        .await
    }
}

/// Builds the search string for an exact SKU match.
pub(crate) fn sku_search_query(sku: &str) -> String {
    let escaped = sku.replace('\\', "\\\\").replace('"', "\\\"");
    format!("sku:\"{escaped}\"")
}

/// Reduces `"gid://shopify/ProductVariant/4242"` to `4242`.
pub(crate) fn parse_gid(gid: &str) -> Result<i64, ShopifyError> {
    gid.rsplit('/')
        .next()
        .and_then(|tail| tail.parse::<i64>().ok())
        .ok_or_else(|| ShopifyError::MalformedResponse {
            context: "global ID".to_owned(),
            reason: format!("\"{gid}\" does not end in a numeric ID"),
        })
}
