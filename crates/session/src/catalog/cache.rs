//! Cache types for catalog API responses.

use shopfront_core::{ProductId, ProductRef};

/// Cache key for products and category listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Category(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductRef>),
    Category(Vec<ProductRef>),
}
