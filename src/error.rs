//! Domain-specific error types for shelfmate

use thiserror::Error;

/// Main error type for the shelfmate recommendation service
#[derive(Error, Debug)]
pub enum ShelfmateError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A catalog code, title or user id with no corresponding row
    #[error("{message}")]
    NotFound { identifier: String, message: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ShelfmateError {
    /// Build a `NotFound` naming the missing key and what kind of key it was
    pub fn not_found(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        ShelfmateError::NotFound {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelfmateError::NotFound { .. })
    }
}

impl From<anyhow::Error> for ShelfmateError {
    fn from(err: anyhow::Error) -> Self {
        ShelfmateError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ShelfmateError {
    fn from(err: std::io::Error) -> Self {
        ShelfmateError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShelfmateError {
    fn from(err: serde_json::Error) -> Self {
        ShelfmateError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ShelfmateError {
    fn from(err: csv::Error) -> Self {
        ShelfmateError::Catalog {
            message: format!("CSV parsing failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for ShelfmateError {
    fn from(err: toml::de::Error) -> Self {
        ShelfmateError::Config {
            message: format!("Invalid TOML: {}", err),
        }
    }
}

/// Result type alias for shelfmate operations
pub type Result<T> = std::result::Result<T, ShelfmateError>;
