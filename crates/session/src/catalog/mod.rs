//! Product catalog client.
//!
//! The catalog is read-only from the session's point of view: it resolves
//! product IDs and categories into [`ProductRef`] snapshots that the front
//! end then hands to the cart.
//!
//! [`HttpCatalog`] talks to a fake-store style REST API:
//!
//! - `GET {base}/products/{id}`
//! - `GET {base}/products/category/{category}`
//!
//! Responses are cached using `moka` (5-minute TTL by default).

mod cache;
mod conversions;

pub use conversions::{CatalogProduct, convert_product};

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::{CurrencyCode, ProductId, ProductRef};

use crate::config::CatalogConfig;
use cache::{CacheKey, CacheValue};

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Catalog returned an unexpected status.
    #[error("Catalog returned status {0}")]
    Status(u16),

    /// Base URL cannot carry path segments.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Read-only product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product.
    async fn get_by_id(&self, id: ProductId) -> Result<ProductRef, CatalogError>;

    /// Fetch every product in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog request fails.
    async fn get_by_category(&self, category: &str) -> Result<Vec<ProductRef>, CatalogError>;
}

// =============================================================================
// HttpCatalog
// =============================================================================

/// Catalog client over HTTP.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<SecretString>,
    currency: CurrencyCode,
    cache: Cache<CacheKey, CacheValue>,
}

impl HttpCatalog {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(HttpCatalogInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                access_token: config.access_token.clone(),
                currency: config.currency,
                cache,
            }),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the JSON body.
    ///
    /// An empty 200 body is treated as not found; some fake-store APIs answer
    /// unknown IDs that way.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        if body.trim().is_empty() || body.trim() == "null" {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_by_id(&self, id: ProductId) -> Result<ProductRef, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let record: CatalogProduct = self.fetch(url).await?;
        let product = convert_product(record, self.inner.currency);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_category(&self, category: &str) -> Result<Vec<ProductRef>, CatalogError> {
        let cache_key = CacheKey::Category(category.to_owned());

        if let Some(CacheValue::Category(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let url = self.endpoint(&["products", "category", category])?;
        let records: Vec<CatalogProduct> = self.fetch(url).await?;
        let products: Vec<ProductRef> = records
            .into_iter()
            .map(|record| convert_product(record, self.inner.currency))
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(products.clone()))
            .await;

        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn catalog_for(server: &MockServer) -> HttpCatalog {
        HttpCatalog::new(&CatalogConfig::new(server.uri().parse().unwrap()))
    }

    #[tokio::test]
    async fn test_get_by_id_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":1,"title":"Backpack","price":109.95,"image":"https://img/1.png","stock":3}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = catalog_for(&server);
        let first = catalog.get_by_id(ProductId::new(1)).await.unwrap();
        let second = catalog.get_by_id(ProductId::new(1)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, "Backpack");
        assert!(first.in_stock);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/999"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server);
        assert!(matches!(
            catalog.get_by_id(ProductId::new(404)).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.get_by_id(ProductId::new(999)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = catalog_for(&server)
            .get_by_id(ProductId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = catalog_for(&server)
            .get_by_category("jewelery")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Status(503)));
    }

    #[tokio::test]
    async fn test_get_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/category/electronics"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id":1,"title":"Shirt","price":"22.30"},{"id":2,"title":"Jacket","price":55.99,"stock":0}]"#,
            ))
            .mount(&server)
            .await;

        let products = catalog_for(&server)
            .get_by_category("electronics")
            .await
            .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products.iter().filter(|p| !p.in_stock).count(), 1);
    }

    #[tokio::test]
    async fn test_bearer_token_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer aB3xY9mK2nL5pQ7rT0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"id":5,"title":"Mug","price":4.5}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = CatalogConfig::new(server.uri().parse().unwrap());
        config.access_token = Some(SecretString::from("aB3xY9mK2nL5pQ7rT0"));
        let product = HttpCatalog::new(&config)
            .get_by_id(ProductId::new(5))
            .await
            .unwrap();
        assert_eq!(product.name, "Mug");
    }
}
