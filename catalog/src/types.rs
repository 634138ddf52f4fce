//! Wire and domain types for the product catalog

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use special_offers_core::offer::Money;

/// A product as the catalog sends it.
///
/// The catalog identifies products by string ids; everything else is carried
/// through verbatim. Unknown fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Product id, numeric but sent as a string
    pub product_id: String,
    /// Display name
    pub product_name: String,
    /// Description
    pub product_description: String,
    /// Price
    pub price: Money,
}

/// A catalog product as the shopping cart sees it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShoppingCartItem {
    /// Catalog product id
    pub product_catalog_id: i64,
    /// Display name
    pub product_name: String,
    /// Description
    pub description: String,
    /// Price
    pub price: Money,
}

impl TryFrom<CatalogProduct> for ShoppingCartItem {
    type Error = CatalogError;

    fn try_from(product: CatalogProduct) -> Result<Self, Self::Error> {
        let product_catalog_id = product.product_id.trim().parse::<i64>().map_err(|e| {
            CatalogError::DecodeFailed(format!("invalid product id {:?}: {e}", product.product_id))
        })?;

        Ok(Self {
            product_catalog_id,
            product_name: product.product_name,
            description: product.product_description,
            price: product.price,
        })
    }
}

/// Decode a catalog response body into cart items, preserving order.
///
/// # Errors
///
/// Returns `CatalogError::DecodeFailed` if the body is not a JSON array of
/// products or any product id is not an integer.
pub fn decode_products(body: &[u8]) -> Result<Vec<ShoppingCartItem>, CatalogError> {
    let products: Vec<CatalogProduct> =
        serde_json::from_slice(body).map_err(|e| CatalogError::DecodeFailed(e.to_string()))?;

    products.into_iter().map(ShoppingCartItem::try_from).collect()
}
