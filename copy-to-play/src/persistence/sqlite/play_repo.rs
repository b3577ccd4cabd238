//! SQLite-backed implementation of [`PlayRepository`] over `puzzle2_puzzle`.

use puzzle::{Glicko, PlayPuzzle, PuzzleId};
use sqlx::SqlitePool;

use crate::persistence::traits::PlayRepository;
use crate::persistence::PersistenceError;

type PlayRow = (String, String, String, String, f64, f64, f64, i32, i32, String, String);

pub struct SqlitePlayRepository {
    pool: SqlitePool,
}

impl SqlitePlayRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load_puzzle(&self, id: &PuzzleId) -> Result<Option<PlayPuzzle>, PersistenceError> {
        let row: Option<PlayRow> = sqlx::query_as(
            "SELECT id, game_id, fen, themes, glicko_r, glicko_d, glicko_v, \
                    plays, vote, line, generator \
             FROM puzzle2_puzzle WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_row).transpose()
    }

    /// All play puzzles ordered by id.
    pub async fn list_puzzles(&self) -> Result<Vec<PlayPuzzle>, PersistenceError> {
        let rows: Vec<PlayRow> = sqlx::query_as(
            "SELECT id, game_id, fen, themes, glicko_r, glicko_d, glicko_v, \
                    plays, vote, line, generator \
             FROM puzzle2_puzzle ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn count(&self) -> Result<u64, PersistenceError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM puzzle2_puzzle")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}

fn decode_row(row: PlayRow) -> Result<PlayPuzzle, PersistenceError> {
    let (id, game_id, fen, themes, r, d, v, plays, vote, line, generator) = row;
    Ok(PlayPuzzle {
        id: PuzzleId::new(id),
        game_id,
        fen,
        themes: serde_json::from_str(&themes)?,
        glicko: Glicko { r, d, v },
        plays,
        vote,
        line,
        generator,
    })
}

impl PlayRepository for SqlitePlayRepository {
    async fn insert_puzzle(&self, puzzle: &PlayPuzzle) -> Result<(), PersistenceError> {
        let themes = serde_json::to_string(&puzzle.themes)?;

        let result = sqlx::query(
            r#"
            INSERT INTO puzzle2_puzzle
                (id, game_id, fen, themes, glicko_r, glicko_d, glicko_v,
                 plays, vote, line, generator)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(puzzle.id.as_str())
        .bind(&puzzle.game_id)
        .bind(&puzzle.fen)
        .bind(themes)
        .bind(puzzle.glicko.r)
        .bind(puzzle.glicko.d)
        .bind(puzzle.glicko.v)
        .bind(puzzle.plays)
        .bind(puzzle.vote)
        .bind(&puzzle.line)
        .bind(&puzzle.generator)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(PersistenceError::Duplicate(puzzle.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
