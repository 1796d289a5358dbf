//! Session state types.
//!
//! A [`Session`] is a plain value: it can be serialized, stored by a front
//! end between runs, and handed back to
//! [`SessionStore::restore`](crate::SessionStore::restore).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_core::{Cart, UserAccount, Wishlist};

/// Identifier for one browsing session, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Who the session belongs to.
///
/// The variant also selects the active cart and wishlist: the account's
/// when authenticated, the session's anonymous ones otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    Authenticated {
        /// Working copy of the account; the directory holds the durable one.
        account: Box<UserAccount>,
    },
}

/// Whether the authenticated account has been written back to the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Synced,
    /// A write-back failed; the in-memory account is ahead of the directory.
    Pending { reason: String },
}

impl SyncStatus {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Root session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) auth: AuthState,
    pub(crate) anonymous_cart: Cart,
    pub(crate) anonymous_wishlist: Wishlist,
    #[serde(default)]
    pub(crate) sync: SyncStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh anonymous session with an empty cart and wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            auth: AuthState::Anonymous,
            anonymous_cart: Cart::new(),
            anonymous_wishlist: Wishlist::new(),
            sync: SyncStatus::Synced,
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthState {
        &self.auth
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.auth, AuthState::Authenticated { .. })
    }

    /// The logged-in account's working copy, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserAccount> {
        match &self.auth {
            AuthState::Anonymous => None,
            AuthState::Authenticated { account } => Some(account.as_ref()),
        }
    }

    /// The anonymous cart. Dormant while authenticated.
    #[must_use]
    pub const fn anonymous_cart(&self) -> &Cart {
        &self.anonymous_cart
    }

    #[must_use]
    pub const fn anonymous_wishlist(&self) -> &Wishlist {
        &self.anonymous_wishlist
    }

    #[must_use]
    pub const fn sync_status(&self) -> &SyncStatus {
        &self.sync
    }

    /// The cart that cart operations act on.
    #[must_use]
    pub fn active_cart(&self) -> &Cart {
        match &self.auth {
            AuthState::Anonymous => &self.anonymous_cart,
            AuthState::Authenticated { account } => &account.cart,
        }
    }

    /// The wishlist that wishlist operations act on.
    #[must_use]
    pub fn active_wishlist(&self) -> &Wishlist {
        match &self.auth {
            AuthState::Anonymous => &self.anonymous_wishlist,
            AuthState::Authenticated { account } => &account.wishlist,
        }
    }

    pub(crate) fn active_cart_mut(&mut self) -> &mut Cart {
        match &mut self.auth {
            AuthState::Anonymous => &mut self.anonymous_cart,
            AuthState::Authenticated { account } => &mut account.cart,
        }
    }

    pub(crate) fn active_wishlist_mut(&mut self) -> &mut Wishlist {
        match &mut self.auth {
            AuthState::Anonymous => &mut self.anonymous_wishlist,
            AuthState::Authenticated { account } => &mut account.wishlist,
        }
    }
}
