//! Cart line items.
//!
//! The persisted shape is a JSON object per line:
//!
//! ```json
//! { "id": "p1", "title": "Widget", "image_url": "https://...", "price": 10.5, "quantity": 1 }
//! ```
//!
//! Prices are written as JSON numbers. `imageUrl` is accepted on read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product plus the quantity of that product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name, not interpreted.
    pub title: String,
    /// Opaque image reference.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price. No rounding or currency logic is applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Number of units.
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line: `price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }

    /// Copy of this item with its quantity replaced.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// A cart item descriptor without a quantity, as handed to `add_to_cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl NewCartItem {
    /// Create a new item descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the descriptor into a cart line with a quantity of one.
    #[must_use]
    pub fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        item.into_cart_item()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn widget() -> NewCartItem {
        NewCartItem::new("p1", "Widget", "u", Decimal::from(10))
    }

    #[test]
    fn test_into_cart_item_starts_at_one() {
        let item = widget().into_cart_item();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, ProductId::new("p1"));
    }

    #[test]
    fn test_line_total() {
        let item = widget().into_cart_item().with_quantity(3);
        assert_eq!(item.line_total(), Decimal::from(30));
        assert_eq!(item.with_quantity(0).line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_line_total_saturates_on_overflow() {
        let mut item = widget().into_cart_item().with_quantity(2);
        item.price = Decimal::from_scientific("5e28").unwrap();
        assert_eq!(item.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_price_serializes_as_number() {
        let item = NewCartItem::new("p1", "Widget", "u", Decimal::new(105, 1)).into_cart_item();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["price"], serde_json::json!(10.5));
        assert_eq!(value["image_url"], "u");
        assert_eq!(value["quantity"], 1);
    }

    #[test]
    fn test_accepts_camel_case_image_url() {
        let json = r#"{"id":"p2","title":"Gadget","imageUrl":"img","price":3,"quantity":4}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image_url, "img");
        assert_eq!(item.price, Decimal::from(3));
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let json = r#"{"id":"p2","title":"Gadget","image_url":"img","price":3,"quantity":-1}"#;
        assert!(serde_json::from_str::<CartItem>(json).is_err());
    }
}
