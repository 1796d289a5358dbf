//! Integration tests for Shopfront.
//!
//! Scenarios run the session against the real collaborators: a
//! [`JsonFileDirectory`] in a temporary data directory and an
//! [`HttpCatalog`] pointed at a `wiremock` server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Browse, register, log in and out across invocations
//! - `write_back` - Directory failures, pending sync and recovery

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront_session::{
    CatalogConfig, HttpCatalog, JsonFileDirectory, Session, SessionStore, UserDirectory,
};

/// A data directory and a mock catalog, alive for one test.
pub struct TestContext {
    pub data_dir: TempDir,
    pub server: MockServer,
    pub catalog: HttpCatalog,
}

impl TestContext {
    /// Start a mock catalog and create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = server
            .uri()
            .parse()
            .unwrap_or_else(|e| panic!("mock server URI: {e}"));
        let catalog = HttpCatalog::new(&CatalogConfig::new(base_url));
        let data_dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

        Self {
            data_dir,
            server,
            catalog,
        }
    }

    /// Serve `GET /products/{id}` from the mock catalog.
    pub async fn stock(&self, id: i32, title: &str, price: &str, stock: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://img.example/{id}.png"),
                "stock": stock,
            })))
            .mount(&self.server)
            .await;
    }

    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.path().join("users.json")
    }

    /// A directory handle over the test's `users.json`, as a fresh process
    /// would open it.
    #[must_use]
    pub fn directory(&self) -> Arc<JsonFileDirectory> {
        Arc::new(JsonFileDirectory::new(self.users_path()))
    }

    /// A new anonymous session.
    #[must_use]
    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.directory() as Arc<dyn UserDirectory>)
    }

    /// Serialize `store`'s session and restore it against a fresh directory
    /// handle, the way the CLI does between invocations.
    ///
    /// # Panics
    ///
    /// Panics if the session does not survive a JSON round trip.
    #[must_use]
    pub fn reopen(&self, store: SessionStore) -> SessionStore {
        let json = serde_json::to_string(&store.into_session())
            .unwrap_or_else(|e| panic!("encode session: {e}"));
        let session: Session =
            serde_json::from_str(&json).unwrap_or_else(|e| panic!("decode session: {e}"));
        SessionStore::restore(self.directory() as Arc<dyn UserDirectory>, session)
    }
}

/// Wrap a test password.
#[must_use]
pub fn password(value: &str) -> SecretString {
    SecretString::from(value)
}
