//! Product snapshot carried by cart lines and wishlist entries.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product as seen at the moment it was added.
///
/// The catalog owns the product; carts and wishlists only keep this
/// snapshot so they can be rendered without another catalog round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price at the time of addition.
    pub unit_price: Price,
    /// Image URL, if the catalog has one.
    pub image: Option<String>,
    /// Whether the product was in stock at the time of addition.
    pub in_stock: bool,
}
