//! Mathematical utility functions

use std::cmp::Ordering;

/// Pair every position with its score and order by descending score.
///
/// The sort is stable, so equal scores keep their original column order.
/// NaN scores rank below every real number.
pub fn rank_descending(scores: &[f32]) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .map(|&s| if s.is_nan() { f32::NEG_INFINITY } else { s })
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// The `k` highest-scoring positions, never including `exclude`
pub fn top_k_excluding(scores: &[f32], exclude: usize, k: usize) -> Vec<(usize, f32)> {
    rank_descending(scores)
        .into_iter()
        .filter(|&(idx, _)| idx != exclude)
        .take(k)
        .collect()
}
