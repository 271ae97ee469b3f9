//! Shopify Admin API request and response shapes.
//!
//! ## IDs
//! GraphQL returns global IDs (`"gid://shopify/ProductVariant/4242"`); REST
//! uses the bare numeric ID. Everything leaving this crate uses the numeric
//! form.
//!
//! ## Prices
//! Both APIs send prices as decimal strings (`"128.33"`). REST writes accept
//! the same format.
//!
//! ## Tags
//! REST product creation takes tags as one comma-separated string.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

/// `data` of the variant-by-SKU query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantLookupData {
    pub product_variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantNode {
    /// Global ID, e.g. `"gid://shopify/ProductVariant/4242"`.
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    pub product: ProductNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductNode {
    /// Global ID, e.g. `"gid://shopify/Product/99"`.
    pub id: String,
}

/// `{"product": {...}}` returned by REST product reads and creates.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: AdminProduct,
}

/// A product from the REST Admin API.
#[derive(Debug, Deserialize)]
pub(crate) struct AdminProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub variants: Vec<AdminVariant>,
}

/// A variant from the REST Admin API.
#[derive(Debug, Deserialize)]
pub(crate) struct AdminVariant {
    pub id: i64,
    pub product_id: i64,
    /// `null` or `""` when the variant has no SKU.
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
}

/// Body of `POST /products.json`.
#[derive(Debug, Serialize)]
pub(crate) struct NewProductEnvelope<'a> {
    pub product: NewProduct<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProduct<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<&'a str>,
    pub vendor: &'a str,
    pub product_type: &'a str,
    pub tags: String,
    pub options: Vec<NewOption>,
    pub variants: Vec<NewVariant<'a>>,
    pub images: Vec<NewImage<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewOption {
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewVariant<'a> {
    pub option1: &'a str,
    /// Two-decimal string, e.g. `"128.33"`.
    pub price: String,
    pub sku: &'a str,
    pub inventory_management: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewImage<'a> {
    pub src: &'a str,
}
