//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Restart round-trips through the file backend
//! - `cart_scenarios` - End-to-end mutation sequences and derived totals
//!
//! The helpers below are shared by the test binaries in `tests/`.

use std::path::Path;

use gomarketplace_cart::{CartStore, FileStorage, StorageKey};
use gomarketplace_core::{CurrencyCode, NewCartItem, format_value};
use rust_decimal::Decimal;

/// Open a file-backed store at `path` without hydrating it.
#[must_use]
pub fn file_store(path: &Path) -> CartStore<FileStorage> {
    CartStore::new(FileStorage::new(path), StorageKey::default())
}

/// A cart item descriptor with a whole-number price.
#[must_use]
pub fn product(id: &str, price: i64) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {id}"),
        format!("https://img.example/{id}.png"),
        Decimal::from(price),
    )
}

/// Display formatter used by the tests.
#[must_use]
pub fn brl(amount: Decimal) -> String {
    format_value(amount, CurrencyCode::BRL)
}
