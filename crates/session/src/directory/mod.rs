//! User directory: durable storage for shopper accounts.
//!
//! The session never owns account storage; it talks to a [`UserDirectory`]
//! handed to it at construction.
//!
//! # Implementations
//!
//! - [`MemoryDirectory`] - process-local map, used by tests and demos
//! - [`JsonFileDirectory`] - a single JSON file keyed by email, written
//!   atomically through one writer

mod json_file;
mod memory;

pub use json_file::JsonFileDirectory;
pub use memory::MemoryDirectory;

use async_trait::async_trait;
use thiserror::Error;

use shopfront_core::{Email, UserAccount};

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Underlying storage I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested account was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Directory backend is temporarily unreachable.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Durable account storage.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up an account by exact email.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` if storage cannot be read.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DirectoryError>;

    /// Store a new account.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Conflict` if the email is already taken.
    async fn create(&self, account: &UserAccount) -> Result<(), DirectoryError>;

    /// Overwrite an existing account.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the account does not exist.
    async fn save(&self, account: &UserAccount) -> Result<(), DirectoryError>;

    /// All accounts, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` if storage cannot be read.
    async fn list(&self) -> Result<Vec<UserAccount>, DirectoryError>;
}

fn duplicate(email: &Email) -> DirectoryError {
    DirectoryError::Conflict(format!("email already exists: {email}"))
}
