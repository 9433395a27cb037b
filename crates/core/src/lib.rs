//! GoMarketplace Core - Shared types library.
//!
//! This crate provides the types shared by the cart store and its consumers:
//! - `cart` - In-memory cart state with key-value persistence
//! - `cli` - Command-line driver for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access. This keeps it lightweight and usable from any consumer.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, cart line items, currencies and price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
