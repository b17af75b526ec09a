//! Immutable matrix snapshot loaded once at process start.
//!
//! A snapshot directory holds two JSON documents produced offline:
//!
//! - `item_matrix.json`: `{ "labels": [title], "similarity": [[f32]] }`
//! - `user_matrix.json`: `{ "users": [id], "books": [title], "ratings": [[f32]], "similarity": [[f32]] }`
//!
//! Shapes are checked on load; symmetry of the similarity matrices is assumed.

use crate::error::{Result, ShelfmateError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::hash::Hash;
use std::io::BufReader;
use std::path::Path;

pub const ITEM_MATRIX_FILE: &str = "item_matrix.json";
pub const USER_MATRIX_FILE: &str = "user_matrix.json";

/// Item labels and their item×item similarity matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMatrix {
    labels: Vec<String>,
    similarity: Vec<Vec<f32>>,
}

impl ItemMatrix {
    pub fn new(labels: Vec<String>, similarity: Vec<Vec<f32>>) -> Result<Self> {
        let matrix = Self { labels, similarity };
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(snapshot_err("item matrix has no labels"));
        }
        check_shape(
            "item similarity",
            &self.similarity,
            self.labels.len(),
            self.labels.len(),
        )?;
        warn_duplicates("item", &self.labels);
        Ok(())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, row: usize) -> Option<&str> {
        self.labels.get(row).map(String::as_str)
    }

    /// Similarity scores of `row` against every item
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.similarity.get(row).map(Vec::as_slice)
    }

    /// First row whose label equals `title` exactly
    pub fn position(&self, title: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == title)
    }

    /// Rows whose diagonal is not the row maximum
    pub fn diagonal_violations(&self) -> Vec<usize> {
        diagonal_violations(&self.similarity)
    }
}

/// User labels, book columns and the user×book rating table.
/// A rating of 0 means "not rated".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingMatrix {
    users: Vec<u64>,
    books: Vec<String>,
    ratings: Vec<Vec<f32>>,
}

impl RatingMatrix {
    pub fn new(users: Vec<u64>, books: Vec<String>, ratings: Vec<Vec<f32>>) -> Result<Self> {
        let matrix = Self {
            users,
            books,
            ratings,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<()> {
        if self.users.is_empty() {
            return Err(snapshot_err("rating matrix has no users"));
        }
        if self.books.is_empty() {
            return Err(snapshot_err("rating matrix has no book columns"));
        }
        check_shape("ratings", &self.ratings, self.users.len(), self.books.len())?;
        warn_duplicates("user", &self.users);
        warn_duplicates("book column", &self.books);
        Ok(())
    }

    pub fn users(&self) -> &[u64] {
        &self.users
    }

    pub fn books(&self) -> &[String] {
        &self.books
    }

    pub fn ratings(&self, user_row: usize) -> Option<&[f32]> {
        self.ratings.get(user_row).map(Vec::as_slice)
    }

    pub fn position(&self, user_id: u64) -> Option<usize> {
        self.users.iter().position(|&u| u == user_id)
    }
}

/// Rating table plus the user×user similarity matrix over the same user axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMatrix {
    #[serde(flatten)]
    ratings: RatingMatrix,
    similarity: Vec<Vec<f32>>,
}

impl UserMatrix {
    pub fn new(ratings: RatingMatrix, similarity: Vec<Vec<f32>>) -> Result<Self> {
        let matrix = Self {
            ratings,
            similarity,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<()> {
        self.ratings.validate()?;
        let m = self.ratings.users.len();
        check_shape("user similarity", &self.similarity, m, m)
    }

    pub fn rating_matrix(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn similarity_row(&self, user_row: usize) -> Option<&[f32]> {
        self.similarity.get(user_row).map(Vec::as_slice)
    }

    pub fn diagonal_violations(&self) -> Vec<usize> {
        diagonal_violations(&self.similarity)
    }
}

/// Both matrix families, shared read-only for the life of the process
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub items: ItemMatrix,
    pub users: UserMatrix,
}

impl Snapshot {
    pub fn new(items: ItemMatrix, users: UserMatrix) -> Self {
        Self { items, users }
    }

    /// Load and validate `item_matrix.json` and `user_matrix.json` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let items: ItemMatrix = read_json(&dir.join(ITEM_MATRIX_FILE))?;
        items.validate()?;
        let users: UserMatrix = read_json(&dir.join(USER_MATRIX_FILE))?;
        users.validate()?;

        tracing::info!(
            "Loaded snapshot from {}: {} items, {} users x {} books",
            dir.display(),
            items.len(),
            users.ratings.users.len(),
            users.ratings.books.len()
        );

        Ok(Self { items, users })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| ShelfmateError::Snapshot {
        message: format!("cannot open {}: {}", path.display(), e),
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ShelfmateError::Snapshot {
        message: format!("cannot parse {}: {}", path.display(), e),
    })
}

fn check_shape(name: &str, rows: &[Vec<f32>], n_rows: usize, n_cols: usize) -> Result<()> {
    if rows.len() != n_rows {
        return Err(snapshot_err(format!(
            "{name} matrix has {} rows, expected {n_rows}",
            rows.len()
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(snapshot_err(format!(
            "{name} matrix row {i} has {} columns, expected {n_cols}",
            row.len()
        )));
    }
    Ok(())
}

fn diagonal_violations(rows: &[Vec<f32>]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(i, row)| {
            let diag = row.get(*i).copied().unwrap_or(f32::NEG_INFINITY);
            row.iter().any(|&s| s > diag)
        })
        .map(|(i, _)| i)
        .collect()
}

fn warn_duplicates<T: Eq + Hash + std::fmt::Debug>(axis: &str, labels: &[T]) {
    let mut seen = HashSet::with_capacity(labels.len());
    let dupes: Vec<&T> = labels.iter().filter(|l| !seen.insert(*l)).collect();
    if !dupes.is_empty() {
        tracing::warn!(
            "{} duplicate {} label(s); lookups use the first occurrence (e.g. {:?})",
            dupes.len(),
            axis,
            dupes[0]
        );
    }
}

fn snapshot_err(message: impl Into<String>) -> ShelfmateError {
    ShelfmateError::Snapshot {
        message: message.into(),
    }
}
