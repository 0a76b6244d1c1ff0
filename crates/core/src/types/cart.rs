//! Shopping cart submitted at checkout.
//!
//! The cart lives only for the duration of a checkout request. Each item
//! carries a snapshot of the book as the shopper saw it so that stale prices
//! or categories can be detected against the catalog.

use serde::{Deserialize, Serialize};

use super::{BookId, CategoryId, Money};

/// Snapshot of the book fields a cart item was priced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub book_id: BookId,
    pub price: Money,
    pub category_id: CategoryId,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartItem {
    pub book_id: BookId,
    pub quantity: i32,
    pub book: BookForm,
}

/// An ordered list of cart items plus the flat surcharge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingCart {
    items: Vec<ShoppingCartItem>,
    surcharge: Money,
}

impl ShoppingCart {
    /// Create a cart.
    #[must_use]
    pub const fn new(items: Vec<ShoppingCartItem>, surcharge: Money) -> Self {
        Self { items, surcharge }
    }

    /// Items in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[ShoppingCartItem] {
        &self.items
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flat amount added on top of the subtotal.
    #[must_use]
    pub const fn surcharge(&self) -> Money {
        self.surcharge
    }

    /// Sum of snapshot price times quantity over all items.
    #[must_use]
    pub fn computed_subtotal(&self) -> Money {
        self.items
            .iter()
            .map(|item| item.book.price.times(item.quantity))
            .sum()
    }

    /// Subtotal plus surcharge.
    #[must_use]
    pub fn total(&self) -> Money {
        self.computed_subtotal() + self.surcharge
    }
}
