//! Shopfront Session library.
//!
//! This crate owns the shopper session: who is logged in, which cart and
//! wishlist are active, and how anonymous containers merge into an account
//! at login.
//!
//! # Collaborators
//!
//! The session is handed its dependencies rather than reaching for globals:
//! - [`UserDirectory`] - durable account storage (memory or JSON file)
//! - [`ProductCatalog`] - product lookups over HTTP, cached
//!
//! # Modules
//!
//! - [`session`] - [`SessionStore`] and the serializable [`Session`] value
//! - [`directory`] - account storage
//! - [`catalog`] - catalog client
//! - [`config`] - environment-driven configuration
//! - [`error`] - session error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
mod credentials;
pub mod directory;
pub mod error;
pub mod session;

pub use catalog::{CatalogError, HttpCatalog, ProductCatalog};
pub use config::{CatalogConfig, ConfigError, ShopfrontConfig};
pub use directory::{DirectoryError, JsonFileDirectory, MemoryDirectory, UserDirectory};
pub use error::SessionError;
pub use session::{AuthState, Session, SessionId, SessionStore, SyncStatus};
