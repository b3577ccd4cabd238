//! Puzzles in the public play collection.

use serde::{Deserialize, Serialize};

use crate::{PuzzleId, SourcePuzzle};

/// Glicko-2 rating triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glicko {
    /// Rating
    pub r: f64,
    /// Deviation
    pub d: f64,
    /// Volatility
    pub v: f64,
}

impl Glicko {
    /// Rating every freshly copied puzzle starts from.
    pub const INITIAL: Glicko = Glicko {
        r: 1500.0,
        d: 500.0,
        v: 0.09,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayPuzzle {
    #[serde(rename = "_id")]
    pub id: PuzzleId,
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub fen: String,
    pub themes: Vec<String>,
    pub glicko: Glicko,
    pub plays: i32,
    pub vote: i32,
    /// Moves joined by single spaces.
    pub line: String,
    pub generator: String,
}

impl PlayPuzzle {
    /// Reshape a build puzzle into its play form with seeded rating and counters.
    ///
    /// Does not check eligibility; see [`SourcePuzzle::is_eligible`].
    pub fn from_source(source: &SourcePuzzle) -> Self {
        Self {
            id: source.id.clone(),
            game_id: source.game_id.clone(),
            fen: source.fen.clone(),
            themes: Vec::new(),
            glicko: Glicko::INITIAL,
            plays: 0,
            vote: 1,
            line: source.moves.join(" "),
            generator: source.generator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn source(moves: &[&str]) -> SourcePuzzle {
        SourcePuzzle {
            id: PuzzleId::from("1"),
            game_id: "g1".to_string(),
            fen: "F1".to_string(),
            moves: moves.iter().map(|m| m.to_string()).collect(),
            generator: "genA".to_string(),
            review: None,
        }
    }

    #[test]
    fn test_from_source_mapping() {
        let play = PlayPuzzle::from_source(&source(&["e4", "e5"]));
        assert_eq!(play.id, PuzzleId::from("1"));
        assert_eq!(play.game_id, "g1");
        assert_eq!(play.fen, "F1");
        assert_eq!(play.line, "e4 e5");
        assert!(play.themes.is_empty());
        assert_eq!(play.glicko, Glicko { r: 1500.0, d: 500.0, v: 0.09 });
        assert_eq!(play.plays, 0);
        assert_eq!(play.vote, 1);
        assert_eq!(play.generator, "genA");
    }

    #[test]
    fn test_serialized_shape() {
        let play = PlayPuzzle::from_source(&source(&["c4", "c5", "Nf3"]));
        let doc = serde_json::to_value(&play).unwrap();
        assert_eq!(doc["_id"], "1");
        assert_eq!(doc["gameId"], "g1");
        assert_eq!(doc["line"], "c4 c5 Nf3");
        assert_eq!(doc["glicko"]["r"], 1500.0);
        assert_eq!(doc["glicko"]["v"], 0.09);
        assert_eq!(doc["themes"], serde_json::json!([]));
    }

    proptest! {
        #[test]
        fn line_splits_back_into_moves(moves in proptest::collection::vec("[a-h][1-8][a-h][1-8][qrbn]?", 2..20)) {
            let refs: Vec<&str> = moves.iter().map(String::as_str).collect();
            let play = PlayPuzzle::from_source(&source(&refs));
            let split: Vec<&str> = play.line.split(' ').collect();
            prop_assert_eq!(split, refs);
        }
    }
}
