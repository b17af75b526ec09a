//! Identifier resolution: external identifiers to matrix rows.

use crate::catalog::Catalog;
use crate::error::{Result, ShelfmateError};
use crate::snapshot::Snapshot;

/// True for an all-digit string of length 10 or 13 (ISBN-10 / ISBN-13 shape).
///
/// ISBN-10 check digits of `X` are deliberately not recognised; such
/// identifiers fall through to title lookup.
pub fn is_catalog_code(identifier: &str) -> bool {
    matches!(identifier.len(), 10 | 13) && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves item and user identifiers against one snapshot
pub struct Resolver<'a> {
    snapshot: &'a Snapshot,
    catalog: &'a dyn Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(snapshot: &'a Snapshot, catalog: &'a dyn Catalog) -> Self {
        Self { snapshot, catalog }
    }

    /// Title a book identifier refers to: the catalog title for a code,
    /// otherwise the identifier itself.
    pub fn resolve_title(&self, identifier: &'a str) -> Result<&'a str> {
        if !is_catalog_code(identifier) {
            return Ok(identifier);
        }
        self.catalog.title_for_isbn(identifier).ok_or_else(|| {
            ShelfmateError::not_found(identifier, "Book with this ISBN not found")
        })
    }

    /// Row of the item matrix for a catalog code or exact title
    pub fn resolve_item(&self, identifier: &'a str) -> Result<usize> {
        let title = self.resolve_title(identifier)?;
        let row = self.snapshot.items.position(title).ok_or_else(|| {
            ShelfmateError::not_found(
                title,
                format!("Book '{}' not found in the recommendation model.", title),
            )
        })?;
        tracing::debug!("Resolved '{}' to item row {}", identifier, row);
        Ok(row)
    }

    /// Row of the rating matrix for a user id
    pub fn resolve_user(&self, user_id: u64) -> Result<usize> {
        self.snapshot
            .users
            .rating_matrix()
            .position(user_id)
            .ok_or_else(|| {
                ShelfmateError::not_found(
                    user_id.to_string(),
                    format!("User ID '{}' not found among active users.", user_id),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookRecord, CsvCatalog};
    use crate::snapshot::{ItemMatrix, RatingMatrix, UserMatrix};

    fn book(isbn: &str, title: &str) -> BookRecord {
        BookRecord {
            isbn: isbn.into(),
            title: title.into(),
            author: "Anon".into(),
            year_of_publication: None,
            publisher: String::new(),
            image_url_s: String::new(),
            image_url_m: String::new(),
            image_url_l: String::new(),
        }
    }

    fn fixture() -> (Snapshot, CsvCatalog) {
        let items = ItemMatrix::new(
            vec!["Dune".into(), "Emma".into()],
            vec![vec![1.0, 0.1], vec![0.1, 1.0]],
        )
        .unwrap();
        let ratings =
            RatingMatrix::new(vec![11, 22], vec!["Dune".into()], vec![vec![0.0], vec![9.0]])
                .unwrap();
        let users = UserMatrix::new(ratings, vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();
        let catalog = CsvCatalog::new(
            vec![
                book("0441172717", "Dune"),
                book("9780000000001", "Not In Model"),
            ],
            Vec::new(),
        );
        (Snapshot::new(items, users), catalog)
    }

    #[test]
    fn test_catalog_code_shape() {
        assert!(is_catalog_code("0441172717"));
        assert!(is_catalog_code("9780441172719"));
        assert!(!is_catalog_code("044117271X"));
        assert!(!is_catalog_code("12345678901"));
        assert!(!is_catalog_code("Dune"));
        assert!(!is_catalog_code(""));
    }

    #[test]
    fn test_resolve_item_by_code_and_title() {
        let (snapshot, catalog) = fixture();
        let resolver = Resolver::new(&snapshot, &catalog);
        assert_eq!(resolver.resolve_item("0441172717").unwrap(), 0);
        assert_eq!(resolver.resolve_item("Emma").unwrap(), 1);
        // idempotent
        assert_eq!(resolver.resolve_item("Emma").unwrap(), 1);
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let (snapshot, catalog) = fixture();
        let resolver = Resolver::new(&snapshot, &catalog);
        let err = resolver.resolve_item("9999999999999").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ISBN"));
    }

    #[test]
    fn test_code_known_to_catalog_but_not_model() {
        let (snapshot, catalog) = fixture();
        let resolver = Resolver::new(&snapshot, &catalog);
        let err = resolver.resolve_item("9780000000001").unwrap_err();
        assert!(err.to_string().contains("Not In Model"));
    }

    #[test]
    fn test_title_match_is_exact() {
        let (snapshot, catalog) = fixture();
        let resolver = Resolver::new(&snapshot, &catalog);
        assert!(resolver.resolve_item("dune").unwrap_err().is_not_found());
        assert!(resolver.resolve_item("Dune ").is_err());
    }

    #[test]
    fn test_resolve_user() {
        let (snapshot, catalog) = fixture();
        let resolver = Resolver::new(&snapshot, &catalog);
        assert_eq!(resolver.resolve_user(22).unwrap(), 1);
        let err = resolver.resolve_user(33).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("33"));
    }
}
