//! Immutable cart snapshots and derived values.
//!
//! A snapshot never changes after it is published. Mutations build a new
//! item sequence from the previous one, so a subscriber holding an older
//! snapshot keeps seeing exactly what it was handed.

use std::sync::Arc;

use gomarketplace_core::{CartItem, ProductId};
use rust_decimal::Decimal;

/// An immutable view of the cart at a point in time.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    items: Arc<[CartItem]>,
}

impl CartSnapshot {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First line with the given product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of `price * quantity` over all lines; zero for an empty cart.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or(Decimal::MAX)
    }

    /// Sum of quantities over all lines; zero for an empty cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The total passed through a display formatter.
    pub fn formatted_total<F>(&self, format: F) -> String
    where
        F: Fn(Decimal) -> String,
    {
        format(self.total())
    }

    /// Whether both snapshots are the same published instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// New snapshot with `item` appended.
    pub(crate) fn push(&self, item: CartItem) -> Self {
        self.items
            .iter()
            .cloned()
            .chain(std::iter::once(item))
            .collect::<Vec<_>>()
            .into()
    }

    /// New snapshot with `update` applied to every line whose ID matches.
    pub(crate) fn map_matching<F>(&self, id: &ProductId, update: F) -> Self
    where
        F: Fn(&CartItem) -> CartItem,
    {
        self.items
            .iter()
            .map(|item| {
                if &item.id == id {
                    update(item)
                } else {
                    item.clone()
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::from(Vec::<CartItem>::new())
    }
}

impl From<Vec<CartItem>> for CartSnapshot {
    fn from(items: Vec<CartItem>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl PartialEq for CartSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for CartSnapshot {}
