//! Book catalog: enrichment of bare title labels into presentational records.
//!
//! The catalog is keyed both by ISBN and by title. A title can appear on
//! several rows (different editions, duplicate dumps); every title lookup in
//! this crate resolves to the first row carrying that title.

use crate::deserializers::de_optional_year;
use crate::error::{Result, ShelfmateError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

pub const BOOKS_FILE: &str = "books.csv";
pub const POPULAR_FILE: &str = "popular.csv";

/// One catalog row, with Book-Crossing column names
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author", default)]
    pub author: String,
    #[serde(
        rename = "Year-Of-Publication",
        deserialize_with = "de_optional_year",
        default
    )]
    pub year_of_publication: Option<i32>,
    #[serde(rename = "Publisher", default)]
    pub publisher: String,
    #[serde(rename = "Image-URL-S", default)]
    pub image_url_s: String,
    #[serde(rename = "Image-URL-M", default)]
    pub image_url_m: String,
    #[serde(rename = "Image-URL-L", default)]
    pub image_url_l: String,
}

impl BookRecord {
    /// Medium cover, the size every listing shows
    pub fn cover_url(&self) -> &str {
        &self.image_url_m
    }
}

/// Entry of the precomputed popularity list, most popular first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopularBook {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(default)]
    pub num_ratings: u32,
    #[serde(default)]
    pub avg_rating: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorCount {
    pub name: String,
    pub books_count: usize,
}

/// Catalog lookups consumed by the resolver and the presentation layer
pub trait Catalog: Send + Sync {
    fn book_by_isbn(&self, isbn: &str) -> Option<&BookRecord>;

    /// First catalog row carrying `title`
    fn first_by_title(&self, title: &str) -> Option<&BookRecord>;

    /// Every row whose author equals `author` exactly, in catalog order
    fn books_by_author(&self, author: &str) -> Vec<&BookRecord>;

    /// Precomputed popularity list, most popular first
    fn popular(&self) -> &[PopularBook];

    fn title_for_isbn(&self, isbn: &str) -> Option<&str> {
        self.book_by_isbn(isbn).map(|b| b.title.as_str())
    }

    /// One record per label that has a catalog match, in label order.
    /// Labels without a match are dropped.
    fn enrich(&self, labels: &[String]) -> Vec<&BookRecord> {
        labels
            .iter()
            .filter_map(|label| {
                let found = self.first_by_title(label);
                if found.is_none() {
                    tracing::debug!("No catalog record for '{}', dropping", label);
                }
                found
            })
            .collect()
    }
}

/// Popular titles joined with the catalog, one record per title, at most `limit`
pub fn popular_books(catalog: &dyn Catalog, limit: usize) -> Vec<&BookRecord> {
    let mut seen = HashSet::new();
    catalog
        .popular()
        .iter()
        .filter_map(|p| catalog.first_by_title(&p.title))
        .filter(|b| seen.insert(b.title.as_str()))
        .take(limit)
        .collect()
}

/// Authors with the most titles on the popularity list.
///
/// Counts run over the whole joined list, not just the first page. Ties keep
/// the order in which authors first appear.
pub fn top_authors(catalog: &dyn Catalog, limit: usize) -> Vec<AuthorCount> {
    let mut counts: Vec<AuthorCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for book in popular_books(catalog, usize::MAX) {
        match index.get(book.author.as_str()) {
            Some(&i) => counts[i].books_count += 1,
            None => {
                index.insert(book.author.as_str(), counts.len());
                counts.push(AuthorCount {
                    name: book.author.clone(),
                    books_count: 1,
                });
            }
        }
    }

    // stable: ties stay in first-appearance order
    counts.sort_by(|a, b| b.books_count.cmp(&a.books_count));
    counts.truncate(limit);
    counts
}

/// In-memory catalog loaded from `books.csv` and `popular.csv`
#[derive(Debug, Clone, Default)]
pub struct CsvCatalog {
    books: Vec<BookRecord>,
    by_isbn: HashMap<String, usize>,
    by_title: HashMap<String, usize>,
    popular: Vec<PopularBook>,
}

impl CsvCatalog {
    pub fn new(books: Vec<BookRecord>, popular: Vec<PopularBook>) -> Self {
        let mut by_isbn = HashMap::with_capacity(books.len());
        let mut by_title = HashMap::with_capacity(books.len());
        for (i, book) in books.iter().enumerate() {
            by_isbn.entry(book.isbn.clone()).or_insert(i);
            by_title.entry(book.title.clone()).or_insert(i);
        }
        Self {
            books,
            by_isbn,
            by_title,
            popular,
        }
    }

    /// Load `books.csv` (required) and `popular.csv` (optional) from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let books_path = dir.join(BOOKS_FILE);
        let books_file = std::fs::File::open(&books_path).map_err(|e| ShelfmateError::Catalog {
            message: format!("cannot open {}: {}", books_path.display(), e),
        })?;
        let books = read_books(books_file)?;

        let popular_path = dir.join(POPULAR_FILE);
        let popular = match std::fs::File::open(&popular_path) {
            Ok(file) => read_popular(file)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "{} not found; /popular and /top_authors will be empty",
                    popular_path.display()
                );
                Vec::new()
            }
            Err(e) => {
                return Err(ShelfmateError::Catalog {
                    message: format!("cannot open {}: {}", popular_path.display(), e),
                });
            }
        };

        let catalog = Self::new(books, popular);
        tracing::info!(
            "Loaded catalog: {} rows, {} distinct titles, {} popular",
            catalog.books.len(),
            catalog.by_title.len(),
            catalog.popular.len()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Catalog for CsvCatalog {
    fn book_by_isbn(&self, isbn: &str) -> Option<&BookRecord> {
        self.by_isbn.get(isbn).map(|&i| &self.books[i])
    }

    fn first_by_title(&self, title: &str) -> Option<&BookRecord> {
        self.by_title.get(title).map(|&i| &self.books[i])
    }

    fn books_by_author(&self, author: &str) -> Vec<&BookRecord> {
        self.books.iter().filter(|b| b.author == author).collect()
    }

    fn popular(&self) -> &[PopularBook] {
        &self.popular
    }
}

/// Parse catalog rows from any CSV source with Book-Crossing headers
pub fn read_books<R: Read>(reader: R) -> Result<Vec<BookRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut books = Vec::new();
    for row in rdr.deserialize::<BookRecord>() {
        books.push(row?);
    }
    Ok(books)
}

pub fn read_popular<R: Read>(reader: R) -> Result<Vec<PopularBook>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut popular = Vec::new();
    for row in rdr.deserialize::<PopularBook>() {
        popular.push(row?);
    }
    Ok(popular)
}
