//! GoMarketplace Cart - persistent in-memory shopping cart.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the canonical list of line items and is the only
//!   way to change it (add, increment, decrement)
//! - Every change publishes a new immutable [`CartSnapshot`] to subscribers,
//!   then writes the whole cart to a [`KeyValueStore`] under one key
//! - The persisted cart is read back once at startup (hydration)
//!
//! # Modules
//!
//! - [`store`] - The cart store and its lifecycle
//! - [`snapshot`] - Immutable snapshots, totals and item counts
//! - [`subscription`] - Subscriber handles
//! - [`storage`] - Key-value port with memory and file backends
//! - [`view`] - Display data for cart screens and badges
//! - [`config`] - Environment configuration
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod view;

pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
pub use snapshot::CartSnapshot;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError, StorageKey};
pub use store::{CartStore, HydrationState};
pub use subscription::SubscriptionId;
pub use view::{CartItemView, CartSummary, CartView};
