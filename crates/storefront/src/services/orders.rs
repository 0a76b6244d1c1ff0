//! Order placement and order details.
//!
//! Placement validates the customer form and the cart, then writes the
//! customer, the order and its line items in a single transaction. If any
//! write fails the transaction is rolled back and the original error is
//! returned; nothing from a failed placement is left behind.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use bookstore_core::validation::{
    check_against_book, check_cart_not_empty, check_quantity, validate_customer_form,
};
use bookstore_core::{
    CustomerForm, LineItem, MAX_CONFIRMATION_NUMBER, Money, NewCustomer, NewOrder, OrderDetails,
    OrderId, ShoppingCart, ValidationError,
};

use crate::db::{
    BookLookup, CustomerStore, LineItemStore, OrderStore, RepositoryError, TransactionManager,
};

/// Errors returned by [`OrderService`].
#[derive(Debug, Error)]
pub enum OrderError {
    /// The checkout input was rejected before any write.
    #[error("validation failed on {}: {}", .0.field, .0.message)]
    Validation(#[from] ValidationError),

    /// No order exists with this ID.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// A storage operation failed. During placement this is returned after
    /// the transaction was rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Rolling back a failed placement also failed; the state of the
    /// database is unknown.
    #[error("rollback failed after {cause}: {source}")]
    RollbackFailed {
        /// Error from the rollback itself.
        #[source]
        source: RepositoryError,
        /// Error that triggered the rollback.
        cause: RepositoryError,
    },
}

/// Places orders and assembles order details.
///
/// All collaborators are supplied at construction. The three write stores
/// share the transaction type of the transaction manager.
pub struct OrderService<T: TransactionManager> {
    transactions: Arc<T>,
    books: Arc<dyn BookLookup>,
    customers: Arc<dyn CustomerStore<T::Tx>>,
    orders: Arc<dyn OrderStore<T::Tx>>,
    line_items: Arc<dyn LineItemStore<T::Tx>>,
}

impl<T: TransactionManager> OrderService<T> {
    /// Create an order service from its collaborators.
    #[must_use]
    pub fn new(
        transactions: Arc<T>,
        books: Arc<dyn BookLookup>,
        customers: Arc<dyn CustomerStore<T::Tx>>,
        orders: Arc<dyn OrderStore<T::Tx>>,
        line_items: Arc<dyn LineItemStore<T::Tx>>,
    ) -> Self {
        Self {
            transactions,
            books,
            customers,
            orders,
            line_items,
        }
    }

    /// Validate a checkout and persist it atomically.
    ///
    /// Returns the ID of the new order.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Validation`] if the form or cart is rejected; no
    ///   transaction is opened.
    /// - [`OrderError::Storage`] if a write fails; the transaction has been
    ///   rolled back.
    /// - [`OrderError::RollbackFailed`] if the rollback failed too.
    #[instrument(skip_all, fields(items = cart.items().len()))]
    pub async fn place_order(
        &self,
        form: &CustomerForm,
        cart: &ShoppingCart,
    ) -> Result<OrderId, OrderError> {
        let customer = validate_customer_form(form, Utc::now().date_naive())?;
        self.validate_cart(cart).await?;

        let mut tx = self.transactions.begin().await?;

        match self.write_order(&mut tx, &customer, cart).await {
            Ok(order) => {
                self.transactions.commit(tx).await?;
                tracing::info!(
                    order_id = %order.id,
                    confirmation_number = order.confirmation_number,
                    amount = %order.amount,
                    "Order placed"
                );
                Ok(order.id)
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "Order placement failed, rolling back");
                match self.transactions.rollback(tx).await {
                    Ok(()) => Err(OrderError::Storage(cause)),
                    Err(source) => {
                        tracing::error!(
                            error = %source,
                            cause = %cause,
                            "Rollback failed, database state unknown"
                        );
                        Err(OrderError::RollbackFailed { source, cause })
                    }
                }
            }
        }
    }

    /// Load an order with its customer, line items and books.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if the order does not exist, or
    /// [`OrderError::Storage`] if a lookup fails or a reference dangles.
    #[instrument(skip(self))]
    pub async fn get_order_details(&self, order_id: OrderId) -> Result<OrderDetails, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        let customer = self
            .customers
            .find_by_id(order.customer_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {order_id} references missing customer {}",
                    order.customer_id
                ))
            })?;

        let line_items = self.line_items.find_by_order_id(order_id).await?;

        let mut books = Vec::with_capacity(line_items.len());
        for item in &line_items {
            let book = self.books.find_by_id(item.book_id).await?.ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {order_id} references missing book {}",
                    item.book_id
                ))
            })?;
            books.push(book);
        }

        Ok(OrderDetails {
            order,
            customer,
            line_items,
            books,
        })
    }

    /// Cart checks: non-empty, then per item quantity and catalog match.
    async fn validate_cart(&self, cart: &ShoppingCart) -> Result<(), OrderError> {
        check_cart_not_empty(cart)?;

        for item in cart.items() {
            check_quantity(item)?;
            let book = self.books.find_by_id(item.book_id).await?;
            check_against_book(item, book.as_ref())?;
        }

        Ok(())
    }

    /// The writes of a placement. Runs inside `tx`; commit and rollback are
    /// the caller's job.
    async fn write_order(
        &self,
        tx: &mut T::Tx,
        customer: &NewCustomer,
        cart: &ShoppingCart,
    ) -> Result<PlacedOrder, RepositoryError> {
        let customer_id = self.customers.create(tx, customer).await?;

        let new_order = NewOrder {
            amount: cart.total(),
            confirmation_number: generate_confirmation_number(),
            customer_id,
        };
        let order_id = self.orders.create(tx, &new_order).await?;

        for item in cart.items() {
            let line_item = LineItem {
                order_id,
                book_id: item.book_id,
                quantity: item.quantity,
            };
            self.line_items.create(tx, &line_item).await?;
        }

        Ok(PlacedOrder {
            id: order_id,
            amount: new_order.amount,
            confirmation_number: new_order.confirmation_number,
        })
    }
}

struct PlacedOrder {
    id: OrderId,
    amount: Money,
    confirmation_number: i32,
}

/// Uniform in `0..=MAX_CONFIRMATION_NUMBER`.
fn generate_confirmation_number() -> i32 {
    rand::rng().random_range(0..=MAX_CONFIRMATION_NUMBER)
}
