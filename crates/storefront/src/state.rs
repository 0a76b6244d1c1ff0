//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{
    BookRepository, CustomerRepository, LineItemRepository, OrderRepository, PgTransactions,
};
use crate::services::OrderService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    orders: OrderService<PgTransactions>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the `PostgreSQL` repositories over `pool` and hands them to the
    /// order service.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let orders = OrderService::new(
            Arc::new(PgTransactions::new(pool.clone())),
            Arc::new(BookRepository::new(pool.clone())),
            Arc::new(CustomerRepository::new(pool.clone())),
            Arc::new(OrderRepository::new(pool.clone())),
            Arc::new(LineItemRepository::new(pool.clone())),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService<PgTransactions> {
        &self.inner.orders
    }
}
