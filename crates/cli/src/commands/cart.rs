//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli cart show
//!
//! # Add a product (quantity starts at 1)
//! gm-cli cart add --id p1 --title "Widget" --image-url https://img/p1.png --price 10
//!
//! # Change quantities
//! gm-cli cart increment p1
//! gm-cli cart decrement p1
//!
//! # Forget the persisted cart
//! gm-cli cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_PATH` - File backing the key-value store
//! - `CART_STORAGE_NAMESPACE` - Storage key namespace
//! - `CART_CURRENCY` - Display currency

use gomarketplace_cart::{
    CartConfig, CartError, CartSnapshot, CartStore, CartSummary, CartView, FileStorage,
    KeyValueStore, StorageError,
};
use gomarketplace_core::{NewCartItem, ProductId, format_value};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Cart store operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Storage access failed outside the cart store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Parse a non-negative unit price.
///
/// # Errors
///
/// Returns a message if the value is not a decimal number or is negative.
pub fn parse_price(value: &str) -> Result<Decimal, String> {
    let price: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid price '{value}': {e}"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("price must not be negative (got {price})"));
    }
    Ok(price)
}

/// Print the current cart.
pub async fn show(config: &CartConfig, json: bool) -> Result<(), CartCommandError> {
    let store = open_store(config).await?;
    render(config, &store.snapshot(), json)
}

/// Add a product to the cart.
pub async fn add(config: &CartConfig, item: NewCartItem) -> Result<(), CartCommandError> {
    let store = open_store(config).await?;
    tracing::info!("Adding {} to cart", item.id);
    let snapshot = tolerate_persistence_failure(&store, store.add_to_cart(item).await)?;
    render(config, &snapshot, false)
}

/// Add one unit to the lines for `id`.
pub async fn increment(config: &CartConfig, id: &ProductId) -> Result<(), CartCommandError> {
    let store = open_store(config).await?;
    warn_if_missing(&store.snapshot(), id);
    let snapshot = tolerate_persistence_failure(&store, store.increment(id).await)?;
    render(config, &snapshot, false)
}

/// Remove one unit from the lines for `id`.
pub async fn decrement(config: &CartConfig, id: &ProductId) -> Result<(), CartCommandError> {
    let store = open_store(config).await?;
    warn_if_missing(&store.snapshot(), id);
    let snapshot = tolerate_persistence_failure(&store, store.decrement(id).await)?;
    render(config, &snapshot, false)
}

/// Remove the persisted cart.
pub async fn clear(config: &CartConfig) -> Result<(), CartCommandError> {
    let storage = FileStorage::new(&config.storage_path);
    let key = config.storage_key();
    storage.remove(key.as_str()).await?;
    tracing::info!("Cleared {} in {}", key, storage.path().display());
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Open the file-backed store and hydrate it.
///
/// A corrupted snapshot is reported and the cart starts empty.
async fn open_store(config: &CartConfig) -> Result<CartStore<FileStorage>, CartCommandError> {
    let storage = FileStorage::new(&config.storage_path);
    let store = CartStore::new(storage, config.storage_key());

    match store.hydrate().await {
        Ok(_) => {}
        Err(CartError::Corrupted(e)) => {
            tracing::warn!("Discarding corrupted cart: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(store)
}

/// Keep going with the in-memory cart when only the write failed.
fn tolerate_persistence_failure(
    store: &CartStore<FileStorage>,
    result: Result<CartSnapshot, CartError>,
) -> Result<CartSnapshot, CartError> {
    match result {
        Err(e) if e.is_persistence_failure() => {
            tracing::error!("Cart change not saved: {e}");
            Ok(store.snapshot())
        }
        other => other,
    }
}

fn warn_if_missing(snapshot: &CartSnapshot, id: &ProductId) {
    if snapshot.get(id).is_none() {
        tracing::warn!("No cart line for product {id}");
    }
}

#[allow(clippy::print_stdout)]
fn render(
    config: &CartConfig,
    snapshot: &CartSnapshot,
    json: bool,
) -> Result<(), CartCommandError> {
    let currency = config.currency;
    let format = |amount: Decimal| format_value(amount, currency);

    if json {
        let view = CartView::from_snapshot(snapshot, format);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let view = CartView::from_snapshot(snapshot, format);
    for line in &view.items {
        println!(
            "{:<12} {:<24} x{:<4} {:>12} {:>12}",
            line.id, line.title, line.quantity, line.price, line.line_price
        );
    }

    let summary = CartSummary::from_snapshot(snapshot, format);
    println!("{}  {}", summary.label(), summary.total);
    Ok(())
}
