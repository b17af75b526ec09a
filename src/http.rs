//! HTTP transport module for shelfmate
//!
//! Axum router over [`BookService`]. Field names in the JSON bodies are the
//! public contract consumed by the browser frontend.

use crate::catalog::{AuthorCount, BookRecord};
use crate::error::{Result, ShelfmateError};
use crate::service::{BookService, UserOutcome};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const NO_NEW_RECOMMENDATIONS: &str = "No new recommendations found for this user.";

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub service: BookService,
    pub bind: SocketAddr,
}

/// Listing entry for similar and user recommendations
#[derive(Debug, Serialize)]
pub struct RecommendedBook {
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub isbn: String,
}

impl From<BookRecord> for RecommendedBook {
    fn from(b: BookRecord) -> Self {
        Self {
            cover_url: b.cover_url().to_string(),
            title: b.title,
            author: b.author,
            isbn: b.isbn,
        }
    }
}

/// Full detail view for a single ISBN
#[derive(Debug, Serialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub year_of_publication: Option<i32>,
    pub cover_url: String,
}

impl From<BookRecord> for BookDetails {
    fn from(b: BookRecord) -> Self {
        Self {
            cover_url: b.cover_url().to_string(),
            title: b.title,
            author: b.author,
            isbn: b.isbn,
            publisher: b.publisher,
            year_of_publication: b.year_of_publication,
        }
    }
}

/// Grid entry for author pages and the popular list
#[derive(Debug, Serialize)]
pub struct BookCard {
    pub title: String,
    pub author: String,
    pub cover: String,
    pub isbn: String,
}

impl From<BookRecord> for BookCard {
    fn from(b: BookRecord) -> Self {
        Self {
            cover: b.cover_url().to_string(),
            title: b.title,
            author: b.author,
            isbn: b.isbn,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorEntry {
    pub name: String,
    pub books_count: usize,
}

impl From<AuthorCount> for AuthorEntry {
    fn from(a: AuthorCount) -> Self {
        Self {
            name: a.name,
            books_count: a.books_count,
        }
    }
}

fn convert<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

fn error_response(err: ShelfmateError) -> Response {
    let status = match &err {
        ShelfmateError::NotFound { .. } => StatusCode::NOT_FOUND,
        ShelfmateError::InvalidParams { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::debug!("Request rejected ({}): {}", status, err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let snapshot = state.service.snapshot();
    let ratings = snapshot.users.rating_matrix();
    Json(json!({
        "snapshot": {
            "items": snapshot.items.len(),
            "users": ratings.users().len(),
            "books": ratings.books().len()
        },
        "server": {
            "bind": state.bind.to_string()
        }
    }))
}

// GET /similar/:identifier
pub async fn similar_handler(
    State(state): State<HttpState>,
    Path(identifier): Path<String>,
) -> Response {
    match state.service.similar_books(&identifier) {
        Ok(books) => Json(convert::<_, RecommendedBook>(books)).into_response(),
        Err(e) => error_response(e),
    }
}

// GET /recommend/:user_id
pub async fn recommend_handler(
    State(state): State<HttpState>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match user_id.trim().parse::<u64>() {
        Ok(id) => id,
        Err(_) => {
            return error_response(ShelfmateError::InvalidParams {
                message: format!("User ID '{}' is not a number", user_id),
            });
        }
    };

    match state.service.recommend_for_user(user_id) {
        Ok(UserOutcome::Books(books)) => Json(json!({
            "recommendations": convert::<_, RecommendedBook>(books)
        }))
        .into_response(),
        Ok(UserOutcome::NoNewRecommendations) => {
            Json(json!({ "message": NO_NEW_RECOMMENDATIONS })).into_response()
        }
        Err(e) => error_response(e),
    }
}

// GET /book/:isbn
pub async fn book_handler(State(state): State<HttpState>, Path(isbn): Path<String>) -> Response {
    match state.service.book(&isbn) {
        Ok(book) => Json(BookDetails::from(book)).into_response(),
        Err(e) => error_response(e),
    }
}

// GET /author/:name
pub async fn author_handler(State(state): State<HttpState>, Path(name): Path<String>) -> Response {
    match state.service.books_by_author(&name) {
        Ok(books) => Json(json!({ "books": convert::<_, BookCard>(books) })).into_response(),
        Err(e) => error_response(e),
    }
}

// GET /popular
pub async fn popular_handler(State(state): State<HttpState>) -> Json<Vec<BookCard>> {
    Json(convert(state.service.popular()))
}

// GET /top_authors
pub async fn top_authors_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let authors: Vec<AuthorEntry> = convert(state.service.top_authors());
    Json(json!({ "authors": authors }))
}

/// Build the application router
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/similar/:identifier", get(similar_handler))
        .route("/recommend/:user_id", get(recommend_handler))
        .route("/book/:isbn", get(book_handler))
        .route("/author/:name", get(author_handler))
        .route("/popular", get(popular_handler))
        .route("/top_authors", get(top_authors_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(service: BookService, bind: SocketAddr) -> Result<()> {
    let app = router(HttpState { service, bind });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
