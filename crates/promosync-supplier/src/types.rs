//! PromoOpción `all-products` response types.
//!
//! ## Envelope
//! `{"success": true, "response": [...]}` on success. On failure `success` is
//! `false` and the message is under `"respusta"` (sic); `"respuesta"` is
//! accepted as well.
//!
//! ## Prices
//! `precio` arrives as a decimal string (`"100.00"`) on most products, but a
//! bare JSON number has been seen too. It is kept as a raw
//! [`serde_json::Value`] here and parsed in `normalize.rs`.
//!
//! ## Status
//! `estatus` is `"1"` for sellable children. Anything else is inactive.
//!
//! ## Images
//! Image lists may be `null` instead of `[]`.

use serde::{Deserialize, Deserializer};

/// One parent product from the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoProduct {
    pub sku_padre: String,

    #[serde(default)]
    pub nombre_padre: Option<String>,

    /// HTML description.
    #[serde(default)]
    pub descripcion: Option<String>,

    #[serde(default)]
    pub categorias: Option<String>,

    #[serde(default)]
    pub sub_categorias: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub imagenes_padre: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub hijos: Vec<PromoChild>,
}

/// One child (variant) of a [`PromoProduct`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoChild {
    #[serde(default)]
    pub sku_hijo: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    /// Unit price as a string or number; see the module docs.
    #[serde(default)]
    pub precio: Option<serde_json::Value>,

    /// `"1"` when active.
    #[serde(default)]
    pub estatus: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub imagenes_hijo: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
