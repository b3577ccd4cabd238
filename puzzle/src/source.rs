//! Puzzles as they sit in the build collection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::PuzzleId;

/// Fewest moves a puzzle line may have to be playable.
pub const MIN_MOVES: usize = 2;

/// Curator review attached to a build puzzle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Kept as raw JSON: only an explicit `false` disqualifies a puzzle.
    #[serde(default)]
    pub approved: Option<Value>,
}

/// A puzzle document from the build collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePuzzle {
    #[serde(rename = "_id")]
    pub id: PuzzleId,
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub fen: String,
    pub moves: Vec<String>,
    pub generator: String,
    #[serde(default, deserialize_with = "review_if_object")]
    pub review: Option<Review>,
}

/// A `review` that is not an object has no `approved` field to read.
fn review_if_object<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Review>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(mut fields) => Ok(Some(Review {
            approved: fields.remove("approved").filter(|v| !v.is_null()),
        })),
        _ => Ok(None),
    }
}

impl SourcePuzzle {
    /// Absent, `null`, `true` or any other non-`false` value counts as approved.
    pub fn is_approved(&self) -> bool {
        !matches!(
            self.review.as_ref().and_then(|r| r.approved.as_ref()),
            Some(Value::Bool(false))
        )
    }

    pub fn has_playable_line(&self) -> bool {
        self.moves.len() >= MIN_MOVES
    }

    /// Whether this puzzle should be copied into the play collection.
    pub fn is_eligible(&self) -> bool {
        self.is_approved() && self.has_playable_line()
    }
}
