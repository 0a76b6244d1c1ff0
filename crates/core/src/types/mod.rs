//! Core types for the bookstore.
//!
//! This module provides type-safe wrappers and entity types for the catalog
//! and for checkout.

pub mod book;
pub mod cart;
pub mod customer;
pub mod email;
pub mod expiry;
pub mod id;
pub mod money;
pub mod order;

pub use book::{Book, Category, NewBook};
pub use cart::{BookForm, ShoppingCart, ShoppingCartItem};
pub use customer::{Customer, CustomerForm, NewCustomer};
pub use email::{Email, EmailError};
pub use expiry::{CardExpiry, ExpiryError};
pub use id::*;
pub use money::Money;
pub use order::{LineItem, MAX_CONFIRMATION_NUMBER, NewLineItem, NewOrder, Order, OrderDetails};
