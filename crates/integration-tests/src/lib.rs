//! Integration tests for the bookstore.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the storefront
//! cargo run -p bookstore-cli -- migrate
//! cargo run -p bookstore-storefront
//!
//! # Run integration tests
//! cargo test -p bookstore-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Storefront URL (default: `http://localhost:8080`)
//! - `BOOKSTORE_DATABASE_URL` - Database the storefront uses (falls back to `DATABASE_URL`)

use bookstore_core::{Book, Money, NewBook};
use bookstore_storefront::db::{self, BookRepository, CategoryRepository, RepositoryError};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared handles for a test run.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the storefront database and build an HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if no database URL is set or the connection fails.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let database_url = std::env::var("BOOKSTORE_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("BOOKSTORE_DATABASE_URL or DATABASE_URL must be set");
        let pool = db::create_pool(&database_url, 2)
            .await
            .expect("Failed to connect to test database");

        Self {
            client: Client::new(),
            base_url: std::env::var("STOREFRONT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            pool,
        }
    }

    /// Build a URL on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create a uniquely named category holding one book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if an insert fails.
    pub async fn seed_book(&self, cents: i64) -> Result<Book, RepositoryError> {
        let categories = CategoryRepository::new(self.pool.clone());
        let books = BookRepository::new(self.pool.clone());

        let category = categories
            .create(&format!("it-{}", Uuid::new_v4().simple()))
            .await?;
        books
            .create(
                category.id,
                &NewBook {
                    title: "Integration Test Book".to_string(),
                    author: "Test Author".to_string(),
                    price: Money::from_cents(cents),
                    is_public: true,
                    is_featured: false,
                },
            )
            .await
    }

    /// Count rows in a table.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    pub async fn count(&self, table: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        sqlx::query_scalar(&sql).fetch_one(&self.pool).await
    }

    /// Count the customers named `name` and the orders placed by them.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a query fails.
    pub async fn count_for_customer_name(&self, name: &str) -> Result<(i64, i64), sqlx::Error> {
        let customers = sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        let orders = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM customer_order o
            JOIN customer c ON c.id = o.customer_id
            WHERE c.name = $1
            ",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok((customers, orders))
    }

    /// Install a trigger that makes every line-item insert for `book` fail.
    ///
    /// Returns the trigger name to pass to [`Self::remove_line_item_failure`].
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the DDL fails.
    pub async fn fail_line_items_for(&self, book: &Book) -> Result<String, sqlx::Error> {
        let name = format!("it_fail_line_item_{}", Uuid::new_v4().simple());
        let ddl = format!(
            r"
            CREATE FUNCTION {name}() RETURNS trigger LANGUAGE plpgsql AS $$
            BEGIN
                IF NEW.book_id = {book_id} THEN
                    RAISE EXCEPTION 'line item rejected for book {book_id}';
                END IF;
                RETURN NEW;
            END
            $$;
            CREATE TRIGGER {name} BEFORE INSERT ON order_line_item
                FOR EACH ROW EXECUTE FUNCTION {name}();
            ",
            book_id = book.id,
        );
        sqlx::raw_sql(&ddl).execute(&self.pool).await?;
        Ok(name)
    }

    /// Drop a trigger installed by [`Self::fail_line_items_for`].
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the DDL fails.
    pub async fn remove_line_item_failure(&self, name: &str) -> Result<(), sqlx::Error> {
        let ddl = format!(
            "DROP TRIGGER IF EXISTS {name} ON order_line_item; DROP FUNCTION IF EXISTS {name}();"
        );
        sqlx::raw_sql(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

/// Jane Doe's checkout form.
#[must_use]
pub fn jane_doe_form() -> Value {
    json!({
        "name": "Jane Doe",
        "address": "123 Main St",
        "phone": "(555) 123-4567",
        "email": "jane@example.com",
        "ccNumber": "4111-1111-1111-1111",
        "ccExpiryMonth": "12",
        "ccExpiryYear": "2099"
    })
}

/// A checkout body buying `quantity` of `book` at its catalog price.
#[must_use]
pub fn checkout_body(form: Value, book: &Book, quantity: i32) -> Value {
    json!({
        "customerForm": form,
        "cart": {
            "itemArray": [
                {
                    "bookId": book.id,
                    "quantity": quantity,
                    "book": {
                        "bookId": book.id,
                        "price": book.price,
                        "categoryId": book.category_id
                    }
                }
            ]
        }
    })
}
