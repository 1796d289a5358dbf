//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shopfront_core::{Email, UserAccount};

use super::{DirectoryError, UserDirectory, duplicate};

/// Process-local account map.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    accounts: RwLock<HashMap<Email, UserAccount>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn create(&self, account: &UserAccount) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(duplicate(&account.email));
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(())
    }

    async fn save(&self, account: &UserAccount) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;
        let slot = accounts
            .get_mut(&account.email)
            .ok_or(DirectoryError::NotFound)?;
        *slot = account.clone();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DirectoryError> {
        let mut accounts: Vec<UserAccount> =
            self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(accounts)
    }
}
