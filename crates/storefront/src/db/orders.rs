//! Order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bookstore_core::{CustomerId, Money, NewOrder, Order, OrderId};

use super::{OrderStore, PgTx, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    amount: Decimal,
    date_created: DateTime<Utc>,
    confirmation_number: i32,
    customer_id: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            amount: Money::new(row.amount),
            date_created: row.date_created,
            confirmation_number: row.confirmation_number,
            customer_id: CustomerId::new(row.customer_id),
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore<PgTx> for OrderRepository {
    async fn create(&self, tx: &mut PgTx, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO customer_order (amount, confirmation_number, customer_id)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(order.amount)
        .bind(order.confirmation_number)
        .bind(order.customer_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer_order"))?;

        Ok(OrderId::new(id))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, amount, date_created, confirmation_number, customer_id
            FROM customer_order
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }
}
