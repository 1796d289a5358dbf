//! JSON file user directory.
//!
//! The whole directory lives in one file, an object keyed by email. Every
//! write is a read-modify-write under a single async mutex, then a temp file
//! plus rename so readers never see a half-written file. Separate processes
//! sharing the file are last-write-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use shopfront_core::{Email, UserAccount};

use super::{DirectoryError, UserDirectory, duplicate};

type Accounts = BTreeMap<Email, UserAccount>;

/// Account storage backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileDirectory {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonFileDirectory {
    /// Use the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Accounts, DirectoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Accounts::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Accounts::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            DirectoryError::DataCorruption(format!("invalid {}: {e}", self.path.display()))
        })
    }

    async fn store(&self, accounts: &Accounts) -> Result<(), DirectoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(accounts)
            .map_err(|e| DirectoryError::DataCorruption(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), accounts = accounts.len(), "Directory written");
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for JsonFileDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self.load().await?.remove(email))
    }

    #[instrument(skip(self, account), fields(email = %account.email))]
    async fn create(&self, account: &UserAccount) -> Result<(), DirectoryError> {
        let _guard = self.writer.lock().await;
        let mut accounts = self.load().await?;
        if accounts.contains_key(&account.email) {
            return Err(duplicate(&account.email));
        }
        accounts.insert(account.email.clone(), account.clone());
        self.store(&accounts).await
    }

    #[instrument(skip(self, account), fields(email = %account.email))]
    async fn save(&self, account: &UserAccount) -> Result<(), DirectoryError> {
        let _guard = self.writer.lock().await;
        let mut accounts = self.load().await?;
        let slot = accounts
            .get_mut(&account.email)
            .ok_or(DirectoryError::NotFound)?;
        *slot = account.clone();
        self.store(&accounts).await
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DirectoryError> {
        Ok(self.load().await?.into_values().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use shopfront_core::{Cart, CurrencyCode, Price, ProductId, ProductRef, Wishlist};

    use super::*;

    fn account(email: &str) -> UserAccount {
        UserAccount::new(
            Email::parse(email).unwrap(),
            "Shopper",
            "hash".to_owned(),
            Cart::new(),
            Wishlist::new(),
        )
    }

    fn product(id: i32) -> ProductRef {
        ProductRef {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_cents(999, CurrencyCode::USD),
            image: None,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let directory = JsonFileDirectory::new(dir.path().join("users.json"));
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.json");

        let mut created = account("a@x.com");
        created.cart.add(product(1));
        JsonFileDirectory::new(&path).create(&created).await.unwrap();

        let reopened = JsonFileDirectory::new(&path);
        let found = reopened
            .find_by_email(&Email::parse("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_duplicate_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let directory = JsonFileDirectory::new(dir.path().join("users.json"));
        directory.create(&account("a@x.com")).await.unwrap();

        let err = directory.create(&account("a@x.com")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict(_)));

        let err = directory.save(&account("b@x.com")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound));
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileDirectory::new(&path).list().await.unwrap_err();
        assert!(matches!(err, DirectoryError::DataCorruption(_)));
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let directory = Arc::new(JsonFileDirectory::new(dir.path().join("users.json")));
        for n in 0..8 {
            directory
                .create(&account(&format!("user{n}@x.com")))
                .await
                .unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let directory = Arc::clone(&directory);
                tokio::spawn(async move {
                    let mut updated = account(&format!("user{n}@x.com"));
                    updated.cart.add(product(n));
                    directory.save(&updated).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let accounts = directory.list().await.unwrap();
        assert_eq!(accounts.len(), 8);
        assert!(accounts.iter().all(|a| a.cart.len() == 1));
    }
}
