pub mod sqlite;
pub mod traits;

pub use traits::{PlayRepository, SourceEntry, SourceRepository};

use puzzle::PuzzleId;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Puzzle {0} already exists")]
    Duplicate(PuzzleId),
    #[error("Invalid document at line {line}: {reason}")]
    InvalidDocument { line: usize, reason: String },
}
