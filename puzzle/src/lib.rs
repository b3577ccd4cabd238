pub mod play;
pub mod source;
pub mod types;

pub use play::{Glicko, PlayPuzzle};
pub use source::{Review, SourcePuzzle, MIN_MOVES};
pub use types::PuzzleId;
