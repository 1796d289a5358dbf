//! Shopfront Core - Shared types library.
//!
//! This crate provides the value types shared by every Shopfront component:
//! - `session` - Session/cart state machine and its collaborators
//! - `cli` - Command-line shopper front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations on them - no I/O,
//! no directory access, no HTTP clients. Cart and wishlist merging lives here
//! because it is plain data manipulation.
//!
//! # Modules
//!
//! - [`types`] - Emails, product IDs, prices, carts, wishlists and accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
