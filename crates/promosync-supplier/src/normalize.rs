//! Normalization from PromoOpción wire types to
//! [`promosync_core::SupplierProduct`].

use std::str::FromStr;

use promosync_core::{SupplierProduct, SupplierVariant, VariantStatus};
use rust_decimal::Decimal;

use crate::types::{PromoChild, PromoProduct};

/// Normalizes a raw [`PromoProduct`] into a [`SupplierProduct`].
///
/// Children without a SKU cannot be matched against the storefront and are
/// dropped with a warning. Blank strings become `None` and blank image URLs
/// are removed.
#[must_use]
pub fn normalize_product(product: PromoProduct) -> SupplierProduct {
    let parent_sku = product.sku_padre.trim().to_owned();
    let name = non_blank(product.nombre_padre).unwrap_or_else(|| parent_sku.clone());

    let children = product
        .hijos
        .into_iter()
        .filter_map(|child| normalize_child(child, &parent_sku))
        .collect();

    SupplierProduct {
        name,
        description: non_blank(product.descripcion),
        category: non_blank(product.categorias),
        sub_category: non_blank(product.sub_categorias),
        parent_images: clean_images(product.imagenes_padre),
        children,
        parent_sku,
    }
}

fn normalize_child(child: PromoChild, parent_sku: &str) -> Option<SupplierVariant> {
    let Some(sku) = non_blank(child.sku_hijo) else {
        tracing::warn!(parent_sku, "dropping supplier child without skuHijo");
        return None;
    };

    let base_price = child.precio.as_ref().and_then(parse_price);
    if base_price.is_none() {
        tracing::warn!(
            parent_sku,
            sku = %sku,
            precio = ?child.precio,
            "supplier price is missing or not a valid amount"
        );
    }

    Some(SupplierVariant {
        sku,
        color: non_blank(child.color),
        base_price,
        status: parse_status(child.estatus.as_ref()),
        child_images: clean_images(child.imagenes_hijo),
    })
}

/// Parses `precio`. Accepts decimal strings and JSON numbers; negative
/// amounts are rejected.
pub(crate) fn parse_price(raw: &serde_json::Value) -> Option<Decimal> {
    let parsed = match raw {
        serde_json::Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        serde_json::Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        _ => None,
    }?;
    (!parsed.is_sign_negative()).then_some(parsed)
}

/// `estatus` is `"1"` (or `1`) for active children.
pub(crate) fn parse_status(raw: Option<&serde_json::Value>) -> VariantStatus {
    let active = match raw {
        Some(serde_json::Value::String(s)) => s.trim() == "1",
        Some(serde_json::Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    };
    if active {
        VariantStatus::Active
    } else {
        VariantStatus::Inactive
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn clean_images(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .map(|u| u.trim().to_owned())
        .filter(|u| !u.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
