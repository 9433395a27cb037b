//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for cart and catalog concepts.

pub mod cart_item;
pub mod id;
pub mod price;

pub use cart_item::{CartItem, NewCartItem};
pub use id::ProductId;
pub use price::{CurrencyCode, CurrencyCodeError, format_value};
