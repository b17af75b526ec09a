//! Shared fixture: a small but complete snapshot directory on disk.
#![allow(dead_code)]

use serde_json::json;
use shelfmate::{BookService, config::Config};
use std::path::Path;
use tempfile::TempDir;

pub const ITEM_LABELS: [&str; 6] = [
    "Dune",
    "Emma",
    "Persuasion",
    "Neuromancer",
    "Foundation",
    "Orphan Title",
];

const BOOKS_CSV: &str = "\
ISBN,Book-Title,Book-Author,Year-Of-Publication,Publisher,Image-URL-S,Image-URL-M,Image-URL-L
0441172717,Dune,Frank Herbert,1965,Chilton,s-dune,m-dune,l-dune
0441013597,Dune,Frank Herbert,2005,Ace,s-dune2,m-dune2,l-dune2
0141439580,Emma,Jane Austen,1815,Penguin,s-emma,m-emma,l-emma
0141439688,Persuasion,Jane Austen,1817,Penguin,s-pers,m-pers,l-pers
0441569595,Neuromancer,William Gibson,1984,Ace,s-neuro,m-neuro,l-neuro
0553293354,Foundation,Isaac Asimov,1951,Bantam,s-found,m-found,l-found
9780000000002,Catalog Only,Nobody,not a year,Nowhere,s-co,m-co,l-co
";

const POPULAR_CSV: &str = "\
Book-Title,num_ratings,avg_rating
Dune,500,8.5
Emma,400,8.0
Persuasion,300,7.5
Foundation,200,8.8
";

/// Write the fixture into `dir`
pub fn write_snapshot(dir: &Path) {
    let items = json!({
        "labels": ITEM_LABELS,
        "similarity": [
            [1.0, 0.1, 0.2, 0.8, 0.9, 0.7],
            [0.1, 1.0, 0.9, 0.0, 0.1, 0.3],
            [0.2, 0.9, 1.0, 0.1, 0.05, 0.2],
            [0.8, 0.0, 0.1, 1.0, 0.6, 0.4],
            [0.9, 0.1, 0.05, 0.6, 1.0, 0.5],
            [0.7, 0.3, 0.2, 0.4, 0.5, 1.0]
        ]
    });
    // 11 rated Dune + Foundation; 44 rated everything
    let users = json!({
        "users": [11, 22, 33, 44],
        "books": ["Dune", "Emma", "Persuasion", "Neuromancer", "Foundation"],
        "ratings": [
            [9.0, 0.0, 0.0, 0.0, 6.0],
            [10.0, 0.0, 0.0, 8.0, 0.0],
            [0.0, 7.0, 0.0, 0.0, 9.0],
            [5.0, 5.0, 5.0, 5.0, 5.0]
        ],
        "similarity": [
            [1.0, 0.9, 0.5, 0.1],
            [0.9, 1.0, 0.2, 0.3],
            [0.5, 0.2, 1.0, 0.4],
            [0.1, 0.3, 0.4, 1.0]
        ]
    });

    std::fs::write(dir.join("item_matrix.json"), items.to_string()).unwrap();
    std::fs::write(dir.join("user_matrix.json"), users.to_string()).unwrap();
    std::fs::write(dir.join("books.csv"), BOOKS_CSV).unwrap();
    std::fs::write(dir.join("popular.csv"), POPULAR_CSV).unwrap();
}

/// A loaded service over a fresh fixture. Keep the `TempDir` alive for the
/// duration of the test.
pub fn service() -> (TempDir, BookService) {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path());
    let mut config = Config::default();
    config.snapshot.dir = dir.path().to_path_buf();
    let service = BookService::load(&config).unwrap();
    (dir, service)
}
