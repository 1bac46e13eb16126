//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROCKETSHOES_API_URL` - Base URL of the products/stock REST API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_API_TOKEN` - Bearer token sent with every API request
//! - `ROCKETSHOES_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Product cache lifetime (default: 300)
//! - `ROCKETSHOES_STORAGE_PATH` - File backing the persistent store (default: `.rocketshoes/storage.json`)
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart is saved under (default: `@RocketShoes:cart`)
//! - `ROCKETSHOES_LOCALE` - Notification language, `en` or `pt-BR` (default: `en`)
//! - `ROCKETSHOES_CURRENCY` - Display currency, `BRL`, `USD` or `EUR` (default: `BRL`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::notify::Locale;

/// Default key the cart is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Products/stock REST API configuration
    pub api: ApiConfig,
    /// Persistent store configuration
    pub storage: StorageConfig,
    /// Language for user-facing notifications
    pub locale: Locale,
    /// Currency prices are displayed in
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// REST API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; `products` and `stock` are resolved relative to it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// API configuration with default timeout and cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding all persisted keys
    pub path: PathBuf,
    /// Key the cart is saved under
    pub key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url: Url = get_parsed(&lookup, "ROCKETSHOES_API_URL", DEFAULT_API_URL)?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "ROCKETSHOES_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let timeout_secs: u64 = get_parsed(
            &lookup,
            "ROCKETSHOES_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )?;
        let cache_ttl_secs: u64 = get_parsed(
            &lookup,
            "ROCKETSHOES_CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )?;

        let api = ApiConfig {
            base_url,
            token: get_optional(&lookup, "ROCKETSHOES_API_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        };

        let storage = StorageConfig {
            path: PathBuf::from(get_or_default(
                &lookup,
                "ROCKETSHOES_STORAGE_PATH",
                DEFAULT_STORAGE_PATH,
            )),
            key: get_or_default(&lookup, "ROCKETSHOES_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        };

        Ok(Self {
            api,
            storage,
            locale: get_parsed(&lookup, "ROCKETSHOES_LOCALE", "en")?,
            currency: get_parsed(&lookup, "ROCKETSHOES_CURRENCY", "BRL")?,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a variable (or its default) parsed into `T`.
fn get_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:3333/");
        assert!(config.api.token.is_none());
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(
            config.storage.path,
            PathBuf::from(".rocketshoes/storage.json")
        );
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.currency, CurrencyCode::BRL);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("ROCKETSHOES_API_URL", "https://api.example.com/v1/"),
            ("ROCKETSHOES_API_TIMEOUT_SECS", "3"),
            ("ROCKETSHOES_STORAGE_KEY", "cart"),
            ("ROCKETSHOES_LOCALE", "pt-BR"),
            ("ROCKETSHOES_CURRENCY", "usd"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.locale, Locale::PtBr);
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_invalid_timeout_names_variable() {
        let err = CartConfig::from_lookup(lookup_from(&[(
            "ROCKETSHOES_API_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();

        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROCKETSHOES_API_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "not a url")]));
        assert!(result.is_err());

        let result = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "mailto:a@b.c")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = CartConfig::from_lookup(lookup_from(&[(
            "ROCKETSHOES_API_TOKEN",
            "super_secret_api_token",
        )]))
        .unwrap();

        let debug_output = format!("{:?}", config.api);

        assert!(debug_output.contains("localhost:3333"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_token"));
    }
}
