//! Cart store error types.
//!
//! Only a corrupted snapshot at startup loses data. Write failures leave the
//! in-memory cart updated and usable, so hosts should log them rather than
//! show them to the end user (see [`CartError::is_persistence_failure`]).

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing the key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted cart could not be decoded. The store starts empty.
    #[error("Corrupted cart snapshot: {0}")]
    Corrupted(#[source] serde_json::Error),

    /// The cart could not be encoded for storage.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A mutation was attempted before startup hydration finished.
    #[error("Cart store used before hydration completed")]
    NotHydrated,

    /// Hydration was requested a second time.
    #[error("Cart store already hydrated")]
    AlreadyHydrated,
}

impl CartError {
    /// Whether the in-memory cart was updated even though this error occurred.
    #[must_use]
    pub const fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Serialize(_))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
