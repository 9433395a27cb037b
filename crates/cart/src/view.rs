//! Display data derived from cart snapshots.
//!
//! Views format money with a caller-supplied function so the cart itself
//! stays currency-agnostic.

use gomarketplace_core::CartItem;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::snapshot::CartSnapshot;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

/// Badge data for the floating cart button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub total: String,
    pub item_count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl CartItemView {
    /// Build the view for one line.
    pub fn from_item<F>(item: &CartItem, format: F) -> Self
    where
        F: Fn(Decimal) -> String,
    {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            price: format(item.price),
            line_price: format(item.line_total()),
        }
    }
}

impl CartView {
    /// Create an empty cart view.
    pub fn empty<F>(format: F) -> Self
    where
        F: Fn(Decimal) -> String,
    {
        Self {
            items: Vec::new(),
            subtotal: format(Decimal::ZERO),
            item_count: 0,
        }
    }

    /// Build the view for a snapshot.
    pub fn from_snapshot<F>(snapshot: &CartSnapshot, format: F) -> Self
    where
        F: Fn(Decimal) -> String,
    {
        Self {
            items: snapshot
                .items()
                .iter()
                .map(|item| CartItemView::from_item(item, &format))
                .collect(),
            subtotal: format(snapshot.total()),
            item_count: snapshot.item_count(),
        }
    }
}

impl CartSummary {
    /// Summarize a snapshot.
    pub fn from_snapshot<F>(snapshot: &CartSnapshot, format: F) -> Self
    where
        F: Fn(Decimal) -> String,
    {
        Self {
            total: snapshot.formatted_total(format),
            item_count: snapshot.item_count(),
        }
    }

    /// Badge text, e.g. "3 itens".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} itens", self.item_count)
    }
}
