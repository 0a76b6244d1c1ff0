//! Line item repository.

use async_trait::async_trait;
use sqlx::PgPool;

use bookstore_core::{BookId, LineItem, NewLineItem, OrderId};

use super::{LineItemStore, PgTx, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    order_id: i64,
    book_id: i64,
    quantity: i32,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            order_id: OrderId::new(row.order_id),
            book_id: BookId::new(row.book_id),
            quantity: row.quantity,
        }
    }
}

/// Repository for line item database operations.
#[derive(Debug, Clone)]
pub struct LineItemRepository {
    pool: PgPool,
}

impl LineItemRepository {
    /// Create a new line item repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LineItemStore<PgTx> for LineItemRepository {
    async fn create(&self, tx: &mut PgTx, line_item: &NewLineItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO order_line_item (order_id, book_id, quantity)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(line_item.order_id)
        .bind(line_item.book_id)
        .bind(line_item.quantity)
        .execute(&mut **tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order_line_item"))?;

        Ok(())
    }

    async fn find_by_order_id(&self, order_id: OrderId) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            r"
            SELECT order_id, book_id, quantity
            FROM order_line_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }
}
