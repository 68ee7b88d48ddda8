use chess_core::moves::to_full_moves;
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLength {
    pub moves: u32,
    pub plies: usize,
    pub result: String,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_games: usize,
    pub total_plies: usize,
    /// Mean length in full moves.
    pub average_game_length: f64,
    pub longest_game: Option<GameLength>,
    pub shortest_game: Option<GameLength>,
}

pub fn calculate(games: &[RoundGame<'_>]) -> Overview {
    let mut longest = Leader::highest();
    let mut shortest = Leader::lowest();
    let mut total_plies = 0;

    for game in games {
        let plies = game.game.ply_count();
        total_plies += plies;
        let record = || GameLength {
            moves: to_full_moves(plies),
            plies,
            result: game.game.headers.result.clone(),
            game: GameRef::of(game),
        };
        longest.offer(plies, record);
        shortest.offer(plies, record);
    }

    let average_game_length = if games.is_empty() {
        0.0
    } else {
        total_plies as f64 / games.len() as f64 / 2.0
    };

    Overview {
        total_games: games.len(),
        total_plies,
        average_game_length,
        longest_game: longest.into_inner(),
        shortest_game: shortest.into_inner(),
    }
}
