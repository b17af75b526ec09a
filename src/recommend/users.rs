use crate::error::{Result, ShelfmateError};
use crate::snapshot::UserMatrix;
use crate::utils::top_k_excluding;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct UserRecommendParams {
    pub neighbors: usize,
    /// Strict lower bound on a neighbour's rating for the book to count as liked
    pub like_threshold: f32,
    pub limit: usize,
}

impl Default for UserRecommendParams {
    fn default() -> Self {
        Self {
            neighbors: 10,
            like_threshold: 4.0,
            limit: 10,
        }
    }
}

/// Outcome of a user recommendation; an empty candidate set is not an error
#[derive(Debug, Clone, PartialEq)]
pub enum UserRecommendations {
    Books(Vec<String>),
    NoNewRecommendations,
}

impl UserRecommendations {
    pub fn books(&self) -> &[String] {
        match self {
            UserRecommendations::Books(books) => books,
            UserRecommendations::NoNewRecommendations => &[],
        }
    }
}

/// The `k` users most similar to `user_row`, excluding the user itself
pub fn nearest_neighbors(users: &UserMatrix, user_row: usize, k: usize) -> Result<Vec<(usize, f32)>> {
    let sims = users
        .similarity_row(user_row)
        .ok_or_else(|| row_out_of_range(user_row, users))?;
    Ok(top_k_excluding(sims, user_row, k))
}

/// Books liked by the nearest neighbours that the user has not rated yet.
///
/// Candidates are ordered by summed similarity of the neighbours who liked
/// them, then by title, before truncation to `params.limit`.
pub fn recommend_for_user(
    users: &UserMatrix,
    user_row: usize,
    params: UserRecommendParams,
) -> Result<UserRecommendations> {
    let neighbors = nearest_neighbors(users, user_row, params.neighbors)?;
    let matrix = users.rating_matrix();
    let books = matrix.books();

    let target = matrix
        .ratings(user_row)
        .ok_or_else(|| row_out_of_range(user_row, users))?;
    let rated_by_target: HashSet<&str> = target
        .iter()
        .zip(books)
        .filter(|(r, _)| **r > 0.0)
        .map(|(_, b)| b.as_str())
        .collect();

    let mut candidates: HashMap<&str, f32> = HashMap::new();
    for &(neighbor, similarity) in &neighbors {
        let Some(ratings) = matrix.ratings(neighbor) else {
            continue;
        };
        for (rating, book) in ratings.iter().zip(books) {
            if *rating > params.like_threshold {
                *candidates.entry(book.as_str()).or_default() += similarity;
            }
        }
    }
    candidates.retain(|book, _| !rated_by_target.contains(book));

    tracing::debug!(
        "User row {}: {} neighbours, {} rated, {} unseen candidates",
        user_row,
        neighbors.len(),
        rated_by_target.len(),
        candidates.len()
    );

    if candidates.is_empty() {
        return Ok(UserRecommendations::NoNewRecommendations);
    }

    let mut ranked: Vec<(&str, f32)> = candidates.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(params.limit);

    Ok(UserRecommendations::Books(
        ranked.into_iter().map(|(b, _)| b.to_string()).collect(),
    ))
}

fn row_out_of_range(user_row: usize, users: &UserMatrix) -> ShelfmateError {
    ShelfmateError::InvalidParams {
        message: format!(
            "user row {} out of range (0..{})",
            user_row,
            users.rating_matrix().users().len()
        ),
    }
}
