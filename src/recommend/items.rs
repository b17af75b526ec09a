use crate::error::{Result, ShelfmateError};
use crate::snapshot::ItemMatrix;
use crate::utils::top_k_excluding;

/// Labels of the `limit` items most similar to `row`, best first.
///
/// Ties keep column order. The query item is never returned, so the result
/// has `min(limit, N - 1)` entries.
pub fn recommend_similar_items(items: &ItemMatrix, row: usize, limit: usize) -> Result<Vec<String>> {
    let scores = items.row(row).ok_or_else(|| ShelfmateError::InvalidParams {
        message: format!("item row {} out of range (0..{})", row, items.len()),
    })?;

    let labels = items.labels();
    Ok(top_k_excluding(scores, row, limit)
        .into_iter()
        .map(|(col, _)| labels[col].clone())
        .collect())
}
