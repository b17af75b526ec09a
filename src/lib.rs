pub mod catalog;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod http;
pub mod recommend;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod utils;

pub use error::{Result, ShelfmateError};
pub use service::BookService;

/// Initialise the tracing subscriber with the configured filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init();
}
