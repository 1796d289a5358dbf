//! Wishlist types.

use serde::{Deserialize, Serialize};

use super::cart::first_duplicate;
use super::{DuplicateProduct, ProductId, ProductRef};

/// A saved product, without quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub product: ProductRef,
}

/// Ordered set of wishlist entries, unique by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WishlistEntry>", into = "Vec<WishlistEntry>")]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl TryFrom<Vec<WishlistEntry>> for Wishlist {
    type Error = DuplicateProduct;

    fn try_from(entries: Vec<WishlistEntry>) -> Result<Self, Self::Error> {
        match first_duplicate(entries.iter().map(|entry| entry.product.id)) {
            Some(id) => Err(DuplicateProduct(id)),
            None => Ok(Self { entries }),
        }
    }
}

impl From<Wishlist> for Vec<WishlistEntry> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.entries
    }
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Save `product`. Returns `false` if it was already saved.
    pub fn add(&mut self, product: ProductRef) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(WishlistEntry { product });
        true
    }

    /// Remove the entry for `id`, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<WishlistEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Union `other` into this wishlist, appending entries not already saved.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries {
            self.add(entry.product);
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{CurrencyCode, Price};

    fn product(id: i32) -> ProductRef {
        ProductRef {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_cents(500, CurrencyCode::USD),
            image: Some(format!("https://img.example/{id}.png")),
            in_stock: id % 2 == 0,
        }
    }

    #[test]
    fn test_add_is_unique_by_id() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(product(1)));
        assert!(!wishlist.add(product(1)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::new();
        wishlist.add(product(1));
        assert!(wishlist.remove(ProductId::new(1)).is_some());
        assert!(wishlist.remove(ProductId::new(1)).is_none());
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_merge_unions_without_duplicates() {
        let mut persisted = Wishlist::new();
        persisted.add(product(1));
        persisted.add(product(2));

        let mut anonymous = Wishlist::new();
        anonymous.add(product(2));
        anonymous.add(product(3));

        persisted.merge(anonymous);

        let ids: Vec<i32> = persisted
            .entries()
            .iter()
            .map(|entry| entry.product.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_entries_are_rejected_in_json() {
        let mut wishlist = Wishlist::new();
        wishlist.add(product(4));
        let mut json = serde_json::to_value(&wishlist).unwrap();
        let first = json[0].clone();
        json.as_array_mut().unwrap().push(first);

        let err = serde_json::from_value::<Wishlist>(json).unwrap_err();
        assert!(err.to_string().contains("product 4"));
    }
}
