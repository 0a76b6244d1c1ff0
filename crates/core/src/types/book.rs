//! Catalog entities: books and their categories.

use serde::{Deserialize, Serialize};

use super::{BookId, CategoryId, Money};

/// A book category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name, unique across categories.
    pub name: String,
}

/// A book as stored in the catalog.
///
/// This is the authoritative source for price and category when a cart is
/// checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Book ID.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Current price.
    pub price: Money,
    /// Whether the book is listed publicly.
    pub is_public: bool,
    /// Whether the book is featured on its category page.
    pub is_featured: bool,
    /// Category the book belongs to.
    pub category_id: CategoryId,
}

/// Parameters for creating a book.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Price.
    pub price: Money,
    /// Listed publicly.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Featured.
    #[serde(default)]
    pub is_featured: bool,
}

const fn default_true() -> bool {
    true
}
