//! The session state machine.

use std::num::NonZeroU32;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, error, info, instrument, warn};

use shopfront_core::{Cart, Email, ProductId, ProductRef, UserAccount, Wishlist};

use super::{AuthState, Session, SyncStatus};
use crate::credentials;
use crate::directory::{DirectoryError, UserDirectory};
use crate::error::SessionError;

/// Owns one [`Session`] and applies every transition to it.
///
/// Two states, `Anonymous` and `Authenticated`. Cart and wishlist operations
/// act on whichever containers the current state selects; while
/// authenticated, every change is written back to the [`UserDirectory`]
/// before the call returns.
///
/// `register` and `login` are all-or-nothing: on error the session is
/// exactly as it was before the call.
pub struct SessionStore {
    directory: Arc<dyn UserDirectory>,
    session: Session,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Start a fresh anonymous session.
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self::restore(directory, Session::new())
    }

    /// Resume a previously saved session.
    ///
    /// The first store built in a process also pays for one Argon2 hash, so
    /// that unknown-email logins cost the same as wrong-password ones.
    #[must_use]
    pub fn restore(directory: Arc<dyn UserDirectory>, session: Session) -> Self {
        credentials::prepare();
        Self { directory, session }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Give up the store, keeping the session for persistence.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserAccount> {
        self.session.current_user()
    }

    #[must_use]
    pub fn active_cart(&self) -> &Cart {
        self.session.active_cart()
    }

    #[must_use]
    pub fn active_wishlist(&self) -> &Wishlist {
        self.session.active_wishlist()
    }

    #[must_use]
    pub const fn sync_status(&self) -> &SyncStatus {
        self.session.sync_status()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Create an account seeded with copies of the anonymous cart and wishlist.
    ///
    /// The session stays in its current state and keeps its anonymous
    /// containers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEmail` if the email is malformed.
    /// Returns `SessionError::DuplicateAccount` if the email is taken.
    /// Returns `SessionError::DirectoryUnavailable` if the directory fails.
    #[instrument(skip(self, credential), fields(session_id = %self.session.id))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        credential: &SecretString,
    ) -> Result<UserAccount, SessionError> {
        let email = Email::parse(email)?;

        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(SessionError::DuplicateAccount);
        }

        let credential_hash = credentials::hash(credential)?;
        let account = UserAccount::new(
            email,
            name,
            credential_hash,
            self.session.anonymous_cart.clone(),
            self.session.anonymous_wishlist.clone(),
        );

        self.directory
            .create(&account)
            .await
            .map_err(|e| match e {
                DirectoryError::Conflict(_) => SessionError::DuplicateAccount,
                other => SessionError::DirectoryUnavailable(other),
            })?;

        info!(
            email = %account.email,
            cart_lines = account.cart.len(),
            "Account registered"
        );
        Ok(account)
    }

    /// Log in, merging the anonymous cart and wishlist into the account.
    ///
    /// Shared products have their quantities summed; the merged account is
    /// written back before the session switches state. The anonymous
    /// containers are emptied afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCredentials` for an unknown email, a
    /// malformed email, or a wrong credential alike.
    /// Returns `SessionError::AlreadyAuthenticated` if a user is logged in.
    /// Returns `SessionError::DirectoryUnavailable` if the directory fails.
    #[instrument(skip(self, credential), fields(session_id = %self.session.id))]
    pub async fn login(&mut self, email: &str, credential: &SecretString) -> Result<(), SessionError> {
        if self.session.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        let Ok(email) = Email::parse(email) else {
            return Err(credentials::reject_unknown(credential));
        };
        let Some(mut account) = self.directory.find_by_email(&email).await? else {
            return Err(credentials::reject_unknown(credential));
        };
        credentials::verify(credential, &account.credential_hash)?;

        let anonymous_cart = &self.session.anonymous_cart;
        let anonymous_wishlist = &self.session.anonymous_wishlist;
        if !anonymous_cart.is_empty() || !anonymous_wishlist.is_empty() {
            account.cart.merge(anonymous_cart.clone());
            account.wishlist.merge(anonymous_wishlist.clone());
            account.touch();
            self.directory.save(&account).await?;
            debug!(
                cart_lines = account.cart.len(),
                wishlist_entries = account.wishlist.len(),
                "Anonymous session merged into account"
            );
        }

        self.session.anonymous_cart.clear();
        self.session.anonymous_wishlist.clear();
        self.session.sync = SyncStatus::Synced;
        self.session.auth = AuthState::Authenticated {
            account: Box::new(account),
        };

        info!(email = %email, "Logged in");
        Ok(())
    }

    /// Log out and start over with an empty anonymous cart and wishlist.
    ///
    /// The account's durable copy is left as last saved. A pending
    /// write-back gets one more attempt first. Logging out while anonymous
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnsavedChanges` if the pending write-back fails
    /// again. The session is still logged out; the error carries the unsaved
    /// account so the caller can save it once the directory recovers.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if !self.session.is_authenticated() {
            debug!("Logout requested while anonymous");
            return Ok(());
        }

        let flush_error = if self.session.sync.is_pending() {
            match self.directory_save().await {
                Ok(()) => None,
                Err(e) => Some(e),
            }
        } else {
            None
        };

        let previous = std::mem::replace(&mut self.session.auth, AuthState::Anonymous);
        self.session.anonymous_cart.clear();
        self.session.anonymous_wishlist.clear();
        self.session.sync = SyncStatus::Synced;

        let AuthState::Authenticated { account } = previous else {
            return Ok(());
        };
        info!(email = %account.email, "Logged out");

        match flush_error {
            None => Ok(()),
            Some(source) => {
                error!(
                    email = %account.email,
                    error = %source,
                    "Logged out with unsaved account changes"
                );
                Err(SessionError::UnsavedChanges { account, source })
            }
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product` to the active cart.
    ///
    /// Out-of-stock products are accepted. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails;
    /// the item stays in the cart and the sync status becomes pending.
    #[instrument(
        skip(self, product),
        fields(session_id = %self.session.id, product_id = %product.id)
    )]
    pub async fn add_to_cart(&mut self, product: ProductRef) -> Result<NonZeroU32, SessionError> {
        if !product.in_stock {
            debug!("Adding out-of-stock product");
        }
        let quantity = self.session.active_cart_mut().add(product);
        debug!(quantity = quantity.get(), "Added to cart");
        self.persist_change().await?;
        Ok(quantity)
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn remove_from_cart(&mut self, id: ProductId) -> Result<bool, SessionError> {
        if self.session.active_cart_mut().remove(id).is_none() {
            return Ok(false);
        }
        debug!("Removed from cart");
        self.persist_change().await?;
        Ok(true)
    }

    /// Set the quantity of an existing line exactly.
    ///
    /// Zero and negative quantities are rejected rather than treated as a
    /// removal; use [`SessionStore::remove_from_cart`] for that.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuantity` if `quantity` is not in
    /// `1..=u32::MAX`; the line is left unchanged.
    /// Returns `SessionError::NotInCart` if there is no line for `id`.
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails;
    /// the new quantity is kept and the sync status becomes pending.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn set_quantity(&mut self, id: ProductId, quantity: i64) -> Result<(), SessionError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(SessionError::InvalidQuantity(quantity))?;

        if !self.session.active_cart_mut().set_quantity(id, quantity) {
            return Err(SessionError::NotInCart(id));
        }
        debug!("Quantity updated");
        self.persist_change().await
    }

    /// Empty the active cart.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn clear_cart(&mut self) -> Result<(), SessionError> {
        let cart = self.session.active_cart_mut();
        if cart.is_empty() {
            return Ok(());
        }
        cart.clear();
        debug!("Cart cleared");
        self.persist_change().await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Save `product` to the active wishlist. Returns `false` if already saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails.
    #[instrument(
        skip(self, product),
        fields(session_id = %self.session.id, product_id = %product.id)
    )]
    pub async fn add_to_wishlist(&mut self, product: ProductRef) -> Result<bool, SessionError> {
        if !self.session.active_wishlist_mut().add(product) {
            return Ok(false);
        }
        debug!("Added to wishlist");
        self.persist_change().await?;
        Ok(true)
    }

    /// Remove `id` from the active wishlist. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn remove_from_wishlist(&mut self, id: ProductId) -> Result<bool, SessionError> {
        if self.session.active_wishlist_mut().remove(id).is_none() {
            return Ok(false);
        }
        debug!("Removed from wishlist");
        self.persist_change().await?;
        Ok(true)
    }

    /// Empty the active wishlist.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the write-back fails.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn clear_wishlist(&mut self) -> Result<(), SessionError> {
        let wishlist = self.session.active_wishlist_mut();
        if wishlist.is_empty() {
            return Ok(());
        }
        wishlist.clear();
        debug!("Wishlist cleared");
        self.persist_change().await
    }

    // =========================================================================
    // Write-back
    // =========================================================================

    /// Retry a pending write-back. Does nothing when already synced.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DirectoryUnavailable` if the directory still fails.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn retry_sync(&mut self) -> Result<(), SessionError> {
        if !self.session.sync.is_pending() {
            return Ok(());
        }
        self.save_account().await
    }

    /// Stamp and write back the account after a change. No-op when anonymous.
    async fn persist_change(&mut self) -> Result<(), SessionError> {
        let AuthState::Authenticated { account } = &mut self.session.auth else {
            return Ok(());
        };
        account.touch();
        self.save_account().await
    }

    async fn save_account(&mut self) -> Result<(), SessionError> {
        match self.directory_save().await {
            Ok(()) => {
                if self.session.sync.is_pending() {
                    info!("Pending write-back flushed");
                }
                self.session.sync = SyncStatus::Synced;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Account write-back failed, change kept in memory");
                self.session.sync = SyncStatus::Pending {
                    reason: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    async fn directory_save(&self) -> Result<(), DirectoryError> {
        match &self.session.auth {
            AuthState::Authenticated { account } => self.directory.save(account).await,
            AuthState::Anonymous => Ok(()),
        }
    }
}
