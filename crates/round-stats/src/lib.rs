//! Round and season statistics for league games.
//!
//! Each calculator is a pure function over a round's parsed games; the
//! orchestrators in [`document`] and [`highlights`] assemble them into the
//! JSON documents served to the site.

pub mod analysis;
pub mod calculators;
pub mod document;
pub mod error;
pub mod fun_stats;
pub mod highlights;
pub mod records;
pub mod scanner;

pub use analysis::{AnalysisSection, GameEvaluation, MoveQuality, PlyEvaluation};
pub use document::{build_round_stats, RoundStats, StatsDocument};
pub use error::StatsError;
pub use highlights::{
    build_season_highlights, HighlightConfig, HighlightsDocument, SeasonGame, SeasonHighlights,
};
pub use scanner::{prepare, RoundGame};

#[cfg(test)]
pub(crate) mod test_support {
    use chess_core::pgn::replay_san;
    use chess_core::{GameHeaders, ParsedGame, PhaseConfig};

    use crate::scanner::{prepare, RoundGame};

    pub fn game(white: &str, black: &str, result: &str, sans: &[&str]) -> ParsedGame {
        ParsedGame {
            headers: GameHeaders {
                white: Some(white.to_string()),
                black: Some(black.to_string()),
                result: result.to_string(),
                ..GameHeaders::default()
            },
            moves: replay_san(sans).expect("test moves are legal"),
            pgn: String::new(),
        }
    }

    pub fn round(games: &[ParsedGame]) -> Vec<RoundGame<'_>> {
        prepare(games, &PhaseConfig::default())
    }
}
