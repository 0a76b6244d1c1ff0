//! Collaborator traits used by the order service.
//!
//! Writes take the caller's transaction handle so that the customer, order
//! and line-item inserts of one placement share a single transaction. Reads
//! go straight to the pool.

use async_trait::async_trait;

use bookstore_core::{
    Book, BookId, Customer, CustomerId, LineItem, NewCustomer, NewLineItem, NewOrder, Order,
    OrderId,
};

use super::RepositoryError;

/// Begins, commits and rolls back the transaction a placement runs in.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Open transaction handle.
    type Tx: Send + 'static;

    /// Acquire a connection and begin a transaction.
    async fn begin(&self) -> Result<Self::Tx, RepositoryError>;

    /// Commit the transaction.
    async fn commit(&self, tx: Self::Tx) -> Result<(), RepositoryError>;

    /// Roll the transaction back.
    async fn rollback(&self, tx: Self::Tx) -> Result<(), RepositoryError>;
}

/// Catalog lookup.
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Find a book by ID.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError>;
}

/// Customer rows.
#[async_trait]
pub trait CustomerStore<Tx: Send + 'static>: Send + Sync {
    /// Insert a customer inside `tx` and return its generated ID.
    async fn create(
        &self,
        tx: &mut Tx,
        customer: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError>;

    /// Find a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
}

/// Order rows.
#[async_trait]
pub trait OrderStore<Tx: Send + 'static>: Send + Sync {
    /// Insert an order inside `tx` and return its generated ID.
    async fn create(&self, tx: &mut Tx, order: &NewOrder) -> Result<OrderId, RepositoryError>;

    /// Find an order by ID.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
}

/// Line-item rows.
#[async_trait]
pub trait LineItemStore<Tx: Send + 'static>: Send + Sync {
    /// Insert a line item inside `tx`.
    async fn create(&self, tx: &mut Tx, line_item: &NewLineItem) -> Result<(), RepositoryError>;

    /// All line items of an order, in insertion order.
    async fn find_by_order_id(&self, order_id: OrderId) -> Result<Vec<LineItem>, RepositoryError>;
}
