//! Conversions from catalog API records to domain types.

use rust_decimal::Decimal;
use serde::Deserialize;

use shopfront_core::{CurrencyCode, Price, ProductId, ProductRef};

/// Product record as returned by the catalog API.
///
/// `price` may arrive as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Units available. Absent means the catalog does not track stock.
    #[serde(default)]
    pub stock: Option<u32>,
}

/// Snapshot a catalog record as a [`ProductRef`].
pub fn convert_product(record: CatalogProduct, currency: CurrencyCode) -> ProductRef {
    ProductRef {
        id: ProductId::new(record.id),
        name: record.title,
        unit_price: Price::new(record.price, currency),
        image: record.image.filter(|url| !url.is_empty()),
        in_stock: record.stock.is_none_or(|stock| stock > 0),
    }
}
