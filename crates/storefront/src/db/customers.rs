//! Customer repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bookstore_core::{Customer, CustomerId, Email, NewCustomer};

use super::{CustomerStore, PgTx, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    address: String,
    phone: String,
    email: String,
    cc_number: String,
    cc_exp_date: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            address: row.address,
            phone: row.phone,
            email,
            cc_number: row.cc_number,
            cc_expiry: row.cc_exp_date,
        })
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore<PgTx> for CustomerRepository {
    async fn create(
        &self,
        tx: &mut PgTx,
        customer: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO customer (name, address, phone, email, cc_number, cc_exp_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.cc_number)
        .bind(customer.cc_expiry)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer"))?;

        Ok(CustomerId::new(id))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, address, phone, email, cc_number, cc_exp_date
            FROM customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }
}
