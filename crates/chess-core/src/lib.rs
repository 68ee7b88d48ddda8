//! Game model shared by the league stats crates: PGN loading, move-stream
//! helpers, opening classification and phase segmentation.

pub mod error;
pub mod game_data;
pub mod moves;
pub mod openings;
pub mod pgn;
pub mod phases;

pub use error::PgnError;
pub use game_data::{GameHeaders, GameResult, MoveFlags, MoveRecord, ParsedGame};
pub use openings::{classify, Opening, OpeningBook};
pub use phases::{segment, segment_game, GamePhases, Phase, PhaseConfig};
