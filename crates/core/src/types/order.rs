//! Orders, their line items, and the assembled order details view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Book, BookId, Customer, CustomerId, Money, OrderId};

/// Largest confirmation number handed out (inclusive).
pub const MAX_CONFIRMATION_NUMBER: i32 = 999_999_998;

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Cart subtotal plus surcharge.
    pub amount: Money,
    pub date_created: DateTime<Utc>,
    /// Random display number; not unique.
    pub confirmation_number: i32,
    pub customer_id: CustomerId,
}

/// Parameters for inserting an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub amount: Money,
    pub confirmation_number: i32,
    pub customer_id: CustomerId,
}

/// One (book, quantity) row of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub order_id: OrderId,
    pub book_id: BookId,
    pub quantity: i32,
}

/// Parameters for inserting a line item. Same shape as the stored row.
pub type NewLineItem = LineItem;

/// Read-only view joining an order with its customer, line items and books.
///
/// `books[i]` is the book referenced by `line_items[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Customer,
    pub line_items: Vec<LineItem>,
    pub books: Vec<Book>,
}
