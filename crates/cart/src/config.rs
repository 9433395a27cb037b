//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_NAMESPACE` - Storage key namespace (default: `@GoMarketPlace`)
//! - `CART_STORAGE_PATH` - File backing the key-value store (default: `gomarketplace-storage.json`)
//! - `CART_CURRENCY` - ISO 4217 code used for display (default: BRL)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use gomarketplace_core::CurrencyCode;
use thiserror::Error;

use crate::storage::{DEFAULT_NAMESPACE, StorageKey};

const DEFAULT_STORAGE_PATH: &str = "gomarketplace-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct CartConfig {
    /// Namespace prefix of the cart storage key
    pub namespace: String,
    /// Path of the file-backed key-value store
    pub storage_path: PathBuf,
    /// Currency used when formatting totals
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartConfig")
            .field("namespace", &self.namespace)
            .field("storage_path", &self.storage_path)
            .field("currency", &self.currency)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = get("CART_STORAGE_NAMESPACE")
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        if namespace.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_NAMESPACE".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_path = get("CART_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        let currency = match get("CART_CURRENCY") {
            Some(code) => code.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string())
            })?,
            None => CurrencyCode::default(),
        };

        let sentry_dsn = get("SENTRY_DSN").filter(|dsn| !dsn.is_empty());

        Ok(Self {
            namespace,
            storage_path,
            currency,
            sentry_dsn,
        })
    }

    /// Storage key of the cart for the configured namespace.
    #[must_use]
    pub fn storage_key(&self) -> StorageKey {
        StorageKey::cart(&self.namespace)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.namespace, "@GoMarketPlace");
        assert_eq!(config.storage_path, PathBuf::from("gomarketplace-storage.json"));
        assert_eq!(config.currency, CurrencyCode::BRL);
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.storage_key().as_str(), "@GoMarketPlace:cart");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CART_STORAGE_NAMESPACE", "@Test"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("CART_CURRENCY", "usd"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        assert_eq!(config.storage_key().as_str(), "@Test:cart");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_currency() {
        let err = load(&[("CART_CURRENCY", "DOGE")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_CURRENCY"));
    }

    #[test]
    fn test_empty_namespace_rejected() {
        assert!(load(&[("CART_STORAGE_NAMESPACE", "  ")]).is_err());
    }

    #[test]
    fn test_empty_dsn_is_none() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_config_debug_redacts_dsn() {
        let config = CartConfig {
            sentry_dsn: Some("https://super_secret_key@sentry.example/1".to_string()),
            ..CartConfig::default()
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("@GoMarketPlace"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }
}
