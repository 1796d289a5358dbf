//! Session error types.

use thiserror::Error;

use shopfront_core::{EmailError, ProductId, UserAccount};

use crate::directory::DirectoryError;

/// Errors returned by [`SessionStore`](crate::SessionStore) operations.
///
/// Every variant is recoverable; the front end decides between retrying and
/// showing a message.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateAccount,

    /// Unknown email or wrong credential. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Quantity outside `1..=u32::MAX`.
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i64),

    /// The user directory failed. For cart and wishlist edits the in-memory
    /// change is kept and the write-back is marked pending.
    #[error("user directory unavailable: {0}")]
    DirectoryUnavailable(#[from] DirectoryError),

    /// Registration email is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// `login` called while a user is already logged in.
    #[error("already logged in")]
    AlreadyAuthenticated,

    /// No cart line for the product.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Logged out, but the account's pending changes could not be written
    /// back. `account` is the unsaved working copy; saving it to the
    /// directory later completes the write-back.
    #[error("logged out with unsaved account changes: {source}")]
    UnsavedChanges {
        account: Box<UserAccount>,
        source: DirectoryError,
    },

    /// Credential hashing failed.
    #[error("credential hashing error")]
    CredentialHash,
}

impl SessionError {
    /// Whether retrying the same call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DirectoryUnavailable(_) | Self::UnsavedChanges { .. }
        )
    }
}
