//! Key-value persistence port for the cart.
//!
//! The cart store only needs string get/set by key. Backends:
//!
//! - [`MemoryStorage`] - `HashMap` behind a mutex, lost on restart
//! - [`FileStorage`] - a single JSON document on disk, survives restarts
//!
//! # Storage Format
//!
//! The cart is stored under one key, `<namespace>:cart`, as a JSON array of
//! line items. Every write replaces the whole value.

mod file;
mod memory;

use core::fmt;
use std::future::Future;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketPlace";

/// Errors that can occur when reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or device I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be decoded or encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Asynchronous string-keyed storage.
///
/// `get` returns `Ok(None)` when the key was never set or has been removed.
/// `set` overwrites any prior value.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Fully qualified storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key holding the serialized cart for `namespace`, e.g. `@GoMarketPlace:cart`.
    #[must_use]
    pub fn cart(namespace: &str) -> Self {
        Self(format!("{namespace}:cart"))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self::cart(DEFAULT_NAMESPACE)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
