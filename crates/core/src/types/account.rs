//! Shopper account type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cart, Email, Wishlist};

/// A registered shopper with their persisted cart and wishlist.
///
/// The directory owns the durable copy; a logged-in session holds a working
/// copy and writes it back after every change.
///
/// Implements `Debug` manually to redact the credential hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique key.
    pub email: Email,
    pub display_name: String,
    /// Argon2id PHC string.
    pub credential_hash: String,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub wishlist: Wishlist,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create an account with the given cart and wishlist.
    #[must_use]
    pub fn new(
        email: Email,
        display_name: impl Into<String>,
        credential_hash: String,
        cart: Cart,
        wishlist: Wishlist,
    ) -> Self {
        let now = Utc::now();
        Self {
            email,
            display_name: display_name.into(),
            credential_hash,
            cart,
            wishlist,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` after a change.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("credential_hash", &"[REDACTED]")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
