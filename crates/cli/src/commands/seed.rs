//! Seed the catalog with categories and books from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: Classics
//!     books:
//!       - title: Moby-Dick
//!         author: Herman Melville
//!         price: "12.99"
//!       - title: Middlemarch
//!         author: George Eliot
//!         price: "9.50"
//!         isFeatured: true
//! ```
//!
//! Categories are matched by name and books by title within their category,
//! so running the same file twice creates nothing new.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use bookstore_core::NewBook;
use bookstore_storefront::db::{self, BookRepository, CategoryRepository, RepositoryError};

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub categories: Vec<CategorySeed>,
}

/// A category and the books it should contain.
#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub books: Vec<NewBook>,
}

/// What a seeding run created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub books_created: usize,
    pub books_skipped: usize,
}

/// Parse a catalog file.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the document does not match the format.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Check a parsed catalog before touching the database.
///
/// Returns every problem found, in file order.
#[must_use]
pub fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (i, category) in catalog.categories.iter().enumerate() {
        let name = category.name.trim();
        if name.is_empty() {
            errors.push(format!("category #{} has an empty name", i + 1));
        } else if !names.insert(name) {
            errors.push(format!("category '{name}' is listed twice"));
        }

        for book in &category.books {
            if book.title.trim().is_empty() {
                errors.push(format!("category '{name}' has a book with an empty title"));
            }
            if book.author.trim().is_empty() {
                errors.push(format!("book '{}' has an empty author", book.title));
            }
            if book.price.amount().is_sign_negative() {
                errors.push(format!("book '{}' has a negative price", book.title));
            }
        }
    }

    errors
}

/// Seed the catalog from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn catalog(path: &Path) -> Result<SeedSummary, SeedError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;

    // Read and validate before connecting to the database
    let catalog = parse_catalog(&content)?;
    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        for err in &errors {
            tracing::error!("  - {err}");
        }
        return Err(SeedError::Invalid(format!(
            "{} validation errors found",
            errors.len()
        )));
    }
    tracing::info!(
        path = %path.display(),
        categories = catalog.categories.len(),
        "Catalog validated"
    );

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("BOOKSTORE_DATABASE_URL"))?;
    let pool = db::create_pool(&database_url, 1).await?;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let mut summary = SeedSummary::default();

    for seed in &catalog.categories {
        let name = seed.name.trim();
        let category = if let Some(existing) = categories.find_by_name(name).await? {
            existing
        } else {
            summary.categories_created += 1;
            categories.create(name).await?
        };

        let existing: HashSet<String> = books
            .find_by_category(category.id)
            .await?
            .into_iter()
            .map(|b| b.title)
            .collect();

        for book in &seed.books {
            if existing.contains(&book.title) {
                summary.books_skipped += 1;
                continue;
            }
            let created = books.create(category.id, book).await?;
            tracing::debug!(book_id = %created.id, title = %created.title, "Book created");
            summary.books_created += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::Money;

    use super::*;

    const SAMPLE: &str = r#"
categories:
  - name: Classics
    books:
      - title: Moby-Dick
        author: Herman Melville
        price: "12.99"
      - title: Middlemarch
        author: George Eliot
        price: "9.50"
        isFeatured: true
  - name: Poetry
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(SAMPLE).unwrap();

        assert_eq!(catalog.categories.len(), 2);
        let classics = &catalog.categories[0];
        assert_eq!(classics.name, "Classics");
        assert_eq!(classics.books.len(), 2);
        assert_eq!(classics.books[0].price, Money::from_cents(1299));
        assert!(classics.books[0].is_public);
        assert!(!classics.books[0].is_featured);
        assert!(classics.books[1].is_featured);
        assert!(catalog.categories[1].books.is_empty());
    }

    #[test]
    fn test_validate_catalog_accepts_sample() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_validate_catalog_reports_problems() {
        let catalog = parse_catalog(
            r#"
categories:
  - name: Classics
    books:
      - title: ""
        author: Nobody
        price: "1.00"
      - title: Refund
        author: Clerk
        price: "-3.00"
  - name: " Classics "
"#,
        )
        .unwrap();

        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("empty title")));
        assert!(errors.iter().any(|e| e.contains("negative price")));
        assert!(errors.iter().any(|e| e.contains("listed twice")));
    }

    #[test]
    fn test_parse_catalog_rejects_missing_price() {
        let result = parse_catalog(
            r"
categories:
  - name: Classics
    books:
      - title: Moby-Dick
        author: Herman Melville
",
        );
        assert!(matches!(result, Err(SeedError::Yaml(_))));
    }
}
