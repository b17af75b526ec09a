//! Request-level facade: resolve, recommend, enrich.
//!
//! `BookService` owns the immutable snapshot and catalog behind `Arc`s and is
//! cheap to clone into every request handler.

use crate::catalog::{self, AuthorCount, BookRecord, Catalog, CsvCatalog};
use crate::config::{Config, RecommendConfig};
use crate::error::{Result, ShelfmateError};
use crate::recommend::{self, UserRecommendParams, UserRecommendations};
use crate::resolver::Resolver;
use crate::snapshot::Snapshot;
use std::sync::Arc;

/// Enriched outcome of a user recommendation
#[derive(Debug, Clone, PartialEq)]
pub enum UserOutcome {
    Books(Vec<BookRecord>),
    NoNewRecommendations,
}

#[derive(Clone)]
pub struct BookService {
    snapshot: Arc<Snapshot>,
    catalog: Arc<dyn Catalog>,
    settings: RecommendConfig,
}

impl BookService {
    pub fn new(snapshot: Arc<Snapshot>, catalog: Arc<dyn Catalog>, settings: RecommendConfig) -> Self {
        Self {
            snapshot,
            catalog,
            settings,
        }
    }

    /// Load snapshot and catalog from the configured snapshot directory
    pub fn load(config: &Config) -> Result<Self> {
        let dir = &config.snapshot.dir;
        let snapshot = Snapshot::load(dir)?;
        let catalog = CsvCatalog::load(dir)?;
        Ok(Self::new(
            Arc::new(snapshot),
            Arc::new(catalog),
            config.recommend.clone(),
        ))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.snapshot, self.catalog.as_ref())
    }

    /// Titles similar to the book named by `identifier` (ISBN or exact title)
    pub fn similar_titles(&self, identifier: &str) -> Result<Vec<String>> {
        let row = self.resolver().resolve_item(identifier)?;
        recommend::recommend_similar_items(&self.snapshot.items, row, self.settings.similar_items)
    }

    /// Catalog records for books similar to `identifier`; titles missing from
    /// the catalog are dropped
    pub fn similar_books(&self, identifier: &str) -> Result<Vec<BookRecord>> {
        let titles = self.similar_titles(identifier)?;
        Ok(self.enrich(&titles))
    }

    pub fn user_titles(&self, user_id: u64) -> Result<UserRecommendations> {
        let row = self.resolver().resolve_user(user_id)?;
        recommend::recommend_for_user(&self.snapshot.users, row, self.user_params())
    }

    pub fn recommend_for_user(&self, user_id: u64) -> Result<UserOutcome> {
        Ok(match self.user_titles(user_id)? {
            UserRecommendations::Books(titles) => UserOutcome::Books(self.enrich(&titles)),
            UserRecommendations::NoNewRecommendations => UserOutcome::NoNewRecommendations,
        })
    }

    pub fn book(&self, isbn: &str) -> Result<BookRecord> {
        self.catalog
            .book_by_isbn(isbn)
            .cloned()
            .ok_or_else(|| ShelfmateError::not_found(isbn, "Book not found"))
    }

    pub fn books_by_author(&self, author: &str) -> Result<Vec<BookRecord>> {
        let books = self.catalog.books_by_author(author);
        if books.is_empty() {
            return Err(ShelfmateError::not_found(
                author,
                "No books found for this author",
            ));
        }
        Ok(books.into_iter().cloned().collect())
    }

    pub fn popular(&self) -> Vec<BookRecord> {
        catalog::popular_books(self.catalog.as_ref(), self.settings.popular_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn top_authors(&self) -> Vec<AuthorCount> {
        catalog::top_authors(self.catalog.as_ref(), self.settings.top_authors_limit)
    }

    fn enrich(&self, titles: &[String]) -> Vec<BookRecord> {
        self.catalog.enrich(titles).into_iter().cloned().collect()
    }

    fn user_params(&self) -> UserRecommendParams {
        UserRecommendParams {
            neighbors: self.settings.neighbors,
            like_threshold: self.settings.like_threshold,
            limit: self.settings.max_user_recommendations,
        }
    }
}
