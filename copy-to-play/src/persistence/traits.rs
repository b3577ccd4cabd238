//! Async repository traits for the two puzzle collections.
//!
//! The migrator is generic over these so it can run against SQLite in
//! production and against in-memory fakes in tests.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so the
//! bound is spelled out for every implementation, fakes included.

use std::future::Future;

use puzzle::{PlayPuzzle, PuzzleId, SourcePuzzle};

use super::PersistenceError;

/// One row of the build collection as read back.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEntry {
    Puzzle(SourcePuzzle),
    /// The stored document does not describe a puzzle.
    Malformed { id: PuzzleId, reason: String },
}

impl SourceEntry {
    pub fn id(&self) -> &PuzzleId {
        match self {
            SourceEntry::Puzzle(puzzle) => &puzzle.id,
            SourceEntry::Malformed { id, .. } => id,
        }
    }
}

/// Read side: the curated build collection.
pub trait SourceRepository: Send + Sync {
    /// Fetch up to `limit` puzzles whose id sorts after `after`, in id order.
    ///
    /// Implementations may pre-filter puzzles whose review explicitly
    /// rejected them. Rows that fail to decode come back as
    /// [`SourceEntry::Malformed`] in place. An empty page means the
    /// collection is exhausted.
    fn eligible_page(
        &self,
        after: Option<&PuzzleId>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<SourceEntry>, PersistenceError>> + Send;
}

/// Write side: the public play collection.
///
/// Implementations must never overwrite an existing puzzle. Inserting an id
/// that is already present fails with [`PersistenceError::Duplicate`].
pub trait PlayRepository: Send + Sync {
    fn insert_puzzle(
        &self,
        puzzle: &PlayPuzzle,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
