//! Bookstore Core - Shared types and checkout rules.
//!
//! This crate provides the types used across the bookstore components:
//! - `storefront` - HTTP service that places orders and serves order details
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Checkout validation lives here so it can be
//! exercised without a database.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, entities, checkout forms and card expiry
//! - [`validation`] - Field and cart rules applied before an order is placed

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Field, FieldCheck, ValidationError, Violation};
