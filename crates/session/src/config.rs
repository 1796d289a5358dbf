//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_DATA_DIR` - Directory holding `users.json` and `session.json` (default: .shopfront)
//! - `SHOPFRONT_CATALOG_URL` - Base URL of the product catalog API (default: <https://fakestoreapi.com>)
//! - `SHOPFRONT_CATALOG_TOKEN` - Bearer token for the catalog API
//! - `SHOPFRONT_CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SHOPFRONT_CURRENCY` - Currency catalog prices are quoted in (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use shopfront_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".shopfront";
const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shopfront configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Directory for the user directory file and the saved session
    pub data_dir: PathBuf,
    /// Product catalog configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Product catalog API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub base_url: Url,
    /// Optional bearer token
    pub access_token: Option<SecretString>,
    /// How long catalog responses stay cached
    pub cache_ttl: Duration,
    /// Currency the catalog quotes prices in
    pub currency: CurrencyCode,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl", &self.cache_ttl)
            .field("currency", &self.currency)
            .finish()
    }
}

impl CatalogConfig {
    /// Catalog configuration for `base_url` with default cache and currency.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            access_token: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            currency: CurrencyCode::USD,
        }
    }
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the catalog token
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ShopfrontConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let data_dir = PathBuf::from(vars.or_default("SHOPFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let base_url = vars
            .or_default("SHOPFRONT_CATALOG_URL", DEFAULT_CATALOG_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_CATALOG_URL".to_string(), e.to_string())
            })?;
        let access_token = vars
            .optional("SHOPFRONT_CATALOG_TOKEN")
            .map(|token| validated_secret(token, "SHOPFRONT_CATALOG_TOKEN"))
            .transpose()?;
        let cache_ttl_secs = vars
            .or_default(
                "SHOPFRONT_CATALOG_CACHE_TTL_SECS",
                &DEFAULT_CACHE_TTL_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "SHOPFRONT_CATALOG_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;
        let currency = vars
            .or_default("SHOPFRONT_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_CURRENCY".to_string(), e))?;

        Ok(Self {
            data_dir,
            catalog: CatalogConfig {
                base_url,
                access_token,
                cache_ttl: Duration::from_secs(cache_ttl_secs),
                currency,
            },
            sentry_dsn: vars.optional("SENTRY_DSN"),
        })
    }

    /// Path of the JSON user directory.
    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// Path of the saved session.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS
        .iter()
        .find(|pattern| lower.contains(*pattern))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

fn validated_secret(value: String, key: &str) -> Result<SecretString, ConfigError> {
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
