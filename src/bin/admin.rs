//! Admin utility for shelfmate snapshot inspection and one-off queries.
//!
//! Usage:
//!   cargo run --bin admin -- inspect
//!   cargo run --bin admin -- similar "The Da Vinci Code"
//!   cargo run --bin admin -- similar 0385504209
//!   cargo run --bin admin -- recommend 11676
//!
//! Pass `--snapshot-dir <path>` to override the configured directory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use shelfmate::{
    BookService,
    config::Config,
    http::{NO_NEW_RECOMMENDATIONS, RecommendedBook},
    service::UserOutcome,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "admin")]
#[command(about = "Shelfmate snapshot utilities", long_about = None)]
struct Cli {
    /// Snapshot directory (defaults to the configured one)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print snapshot dimensions and rows whose diagonal is not the row maximum
    Inspect,
    /// Books similar to an ISBN or exact title
    Similar { identifier: String },
    /// Collaborative-filtering recommendations for a user id
    Recommend { user_id: u64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.snapshot_dir {
        config.snapshot.dir = dir;
    }
    shelfmate::init_tracing(&config.runtime.log_level);
    config.log_load_warnings();

    let service = BookService::load(&config)?;

    let output = match cli.command {
        Commands::Inspect => inspect(&service),
        Commands::Similar { identifier } => {
            let books: Vec<RecommendedBook> = service
                .similar_books(&identifier)?
                .into_iter()
                .map(RecommendedBook::from)
                .collect();
            json!(books)
        }
        Commands::Recommend { user_id } => match service.recommend_for_user(user_id)? {
            UserOutcome::Books(books) => {
                let books: Vec<RecommendedBook> =
                    books.into_iter().map(RecommendedBook::from).collect();
                json!({ "recommendations": books })
            }
            UserOutcome::NoNewRecommendations => json!({ "message": NO_NEW_RECOMMENDATIONS }),
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn inspect(service: &BookService) -> serde_json::Value {
    let snapshot = service.snapshot();
    let ratings = snapshot.users.rating_matrix();
    let item_violations = snapshot.items.diagonal_violations();
    let user_violations = snapshot.users.diagonal_violations();

    if !item_violations.is_empty() || !user_violations.is_empty() {
        tracing::warn!(
            "Diagonal is not the row maximum for {} item row(s) and {} user row(s)",
            item_violations.len(),
            user_violations.len()
        );
    }

    json!({
        "items": snapshot.items.len(),
        "users": ratings.users().len(),
        "books": ratings.books().len(),
        "item_diagonal_violations": item_violations,
        "user_diagonal_violations": user_violations,
        "popular": service.catalog().popular().len()
    })
}
