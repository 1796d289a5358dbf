//! Cart and cart line types.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s with at most one line per
//! product. Quantities are [`NonZeroU32`], so a line can never sit at zero:
//! removing the last unit means removing the line.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{CurrencyCode, Price, ProductId, ProductRef};

/// One product in a cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot.
    pub product: ProductRef,
    /// Number of units, always at least one.
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Create a line holding a single unit.
    #[must_use]
    pub const fn single(product: ProductRef) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The line's product ID.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.unit_price.times(self.quantity.get())
    }
}

/// A stored cart or wishlist listed the same product twice.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("product {0} is listed more than once")]
pub struct DuplicateProduct(pub ProductId);

/// First product ID that appears more than once in `ids`.
pub(crate) fn first_duplicate(mut ids: impl Iterator<Item = ProductId>) -> Option<ProductId> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

/// Ordered collection of cart lines, unique by product ID.
///
/// Serialized as a plain list of lines; deserialization rejects a list that
/// holds two lines for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = DuplicateProduct;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        match first_duplicate(lines.iter().map(CartLine::product_id)) {
            Some(id) => Err(DuplicateProduct(id)),
            None => Ok(Self { lines }),
        }
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1. Returns the line's new quantity.
    pub fn add(&mut self, product: ProductRef) -> NonZeroU32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id() == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::single(product));
        NonZeroU32::MIN
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLine> {
        self.position(id).map(|index| self.lines.remove(index))
    }

    /// Set the quantity of an existing line.
    ///
    /// Returns `false` if there is no line for `id`.
    pub fn set_quantity(&mut self, id: ProductId, quantity: NonZeroU32) -> bool {
        match self.lines.iter_mut().find(|line| line.product_id() == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Merge `other` into this cart.
    ///
    /// Lines for products already present have their quantities summed and
    /// keep this cart's snapshot; the rest are appended in `other`'s order.
    pub fn merge(&mut self, other: Self) {
        for incoming in other.lines {
            match self
                .lines
                .iter_mut()
                .find(|line| line.product_id() == incoming.product_id())
            {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(incoming.quantity.get());
                }
                None => self.lines.push(incoming),
            }
        }
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    /// Quantity for `id`, or zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.line(id).map_or(0, |line| line.quantity.get())
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of all line prices.
    ///
    /// An empty cart totals zero in the default currency. Returns `None` if
    /// lines are priced in different currencies.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        let mut lines = self.lines.iter();
        let Some(first) = lines.next() else {
            return Some(Price::zero(CurrencyCode::default()));
        };
        lines.try_fold(first.line_price(), |total, line| {
            total.checked_add(line.line_price())
        })
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn product(id: i32, cents: i64) -> ProductRef {
        ProductRef {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_cents(cents, CurrencyCode::USD),
            image: None,
            in_stock: true,
        }
    }

    fn quantities(cart: &Cart) -> HashMap<i32, u32> {
        cart.lines()
            .iter()
            .map(|line| (line.product_id().as_i32(), line.quantity.get()))
            .collect()
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(product(1, 100));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);
    }

    #[test]
    fn test_remove_then_add_starts_at_one() {
        let mut cart = Cart::new();
        cart.add(product(1, 100));
        cart.add(product(1, 100));
        assert!(cart.remove(ProductId::new(1)).is_some());
        cart.add(product(1, 100));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut cart = Cart::new();
        assert!(cart.remove(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(product(1, 100));
        assert!(cart.set_quantity(ProductId::new(1), NonZeroU32::new(7).unwrap()));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 7);
        assert!(!cart.set_quantity(ProductId::new(2), NonZeroU32::MIN));
    }

    #[test]
    fn test_merge_sums_shared_products() {
        let mut persisted = Cart::new();
        for _ in 0..3 {
            persisted.add(product(2, 100));
        }
        persisted.add(product(3, 100));

        let mut anonymous = Cart::new();
        anonymous.add(product(1, 100));
        anonymous.add(product(1, 100));
        anonymous.add(product(2, 100));

        persisted.merge(anonymous);

        let expected = HashMap::from([(1, 2), (2, 4), (3, 1)]);
        assert_eq!(quantities(&persisted), expected);
        assert_eq!(persisted.len(), 3);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.subtotal(),
            Some(Price::zero(CurrencyCode::USD))
        );

        cart.add(product(1, 250));
        cart.add(product(1, 250));
        cart.add(product(2, 1000));
        assert_eq!(
            cart.subtotal(),
            Some(Price::from_cents(1500, CurrencyCode::USD))
        );
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_subtotal_mixed_currency_is_none() {
        let mut cart = Cart::new();
        cart.add(product(1, 100));
        let mut euro = product(2, 100);
        euro.unit_price.currency_code = CurrencyCode::EUR;
        cart.add(euro);
        assert_eq!(cart.subtotal(), None);
    }

    #[test]
    fn test_zero_quantity_line_is_unrepresentable_in_json() {
        let json = r#"[{"product":{"id":1,"name":"x","unit_price":{"amount":"1","currency_code":"USD"},"image":null,"in_stock":true},"quantity":0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_duplicate_lines_are_rejected_in_json() {
        let mut cart = Cart::new();
        cart.add(product(1, 100));
        cart.add(product(2, 100));
        let mut json = serde_json::to_value(&cart).unwrap();
        let first = json[0].clone();
        json.as_array_mut().unwrap().push(first);

        let err = serde_json::from_value::<Cart>(json).unwrap_err();
        assert!(err.to_string().contains("product 1 is listed more than once"));

        let restored: Cart = serde_json::from_value(serde_json::to_value(&cart).unwrap()).unwrap();
        assert_eq!(restored, cart);
    }
}
