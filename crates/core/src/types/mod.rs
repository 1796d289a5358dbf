//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod wishlist;

pub use account::UserAccount;
pub use cart::{Cart, CartLine, DuplicateProduct};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::ProductRef;
pub use wishlist::{Wishlist, WishlistEntry};
