//! Recommendation retrieval over the precomputed matrices.
//!
//! - `items`: "readers who liked X also liked" from the item similarity matrix
//! - `users`: collaborative filtering over a user's nearest neighbours
//!
//! Both work on row indices produced by [`crate::resolver::Resolver`] and
//! return bare title labels; enrichment happens in [`crate::catalog`].

pub mod items;
pub mod users;

pub use items::recommend_similar_items;
pub use users::{UserRecommendParams, UserRecommendations, nearest_neighbors, recommend_for_user};
