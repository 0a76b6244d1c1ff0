//! Book repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bookstore_core::{Book, BookId, CategoryId, Money, NewBook};

use super::{BookLookup, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    price: Decimal,
    is_public: bool,
    is_featured: bool,
    category_id: i64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.title,
            author: row.author,
            price: Money::new(row.price),
            is_public: row.is_public,
            is_featured: row.is_featured,
            category_id: CategoryId::new(row.category_id),
        }
    }
}

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a book in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        category_id: CategoryId,
        book: &NewBook,
    ) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO book (title, author, price, is_public, is_featured, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, author, price, is_public, is_featured, category_id
            ",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .bind(book.is_public)
        .bind(book.is_featured)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "book"))?;

        Ok(row.into())
    }

    /// Get all books in a category, by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, author, price, is_public, is_featured, category_id
            FROM book
            WHERE category_id = $1
            ORDER BY id
            ",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }
}

#[async_trait]
impl BookLookup for BookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, author, price, is_public, is_featured, category_id
            FROM book
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }
}
