//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `orders` - Order placement and order details

pub mod orders;

pub use orders::{OrderError, OrderService};
