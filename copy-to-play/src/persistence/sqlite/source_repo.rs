//! SQLite-backed implementation of [`SourceRepository`] over `puzzle2`.

use puzzle::PuzzleId;
use sqlx::SqlitePool;

use crate::persistence::traits::{SourceEntry, SourceRepository};
use crate::persistence::PersistenceError;

pub struct SqliteSourceRepository {
    pool: SqlitePool,
}

impl SqliteSourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<u64, PersistenceError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM puzzle2")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}

impl SourceRepository for SqliteSourceRepository {
    async fn eligible_page(
        &self,
        after: Option<&PuzzleId>,
        limit: u32,
    ) -> Result<Vec<SourceEntry>, PersistenceError> {
        // json_type yields 'false' only for a literal JSON false; missing
        // fields give NULL, which `IS NOT` keeps.
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT id, doc FROM puzzle2 \
             WHERE json_type(doc, '$.review.approved') IS NOT 'false' \
               AND (?1 IS NULL OR id > ?1) \
             ORDER BY id \
             LIMIT ?2",
        )
        .bind(after.map(PuzzleId::as_str))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|(id, doc)| match serde_json::from_str(&doc) {
                Ok(puzzle) => SourceEntry::Puzzle(puzzle),
                Err(e) => SourceEntry::Malformed {
                    id: PuzzleId::new(id),
                    reason: e.to_string(),
                },
            })
            .collect();

        Ok(entries)
    }
}
