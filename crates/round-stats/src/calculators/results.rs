use chess_core::GameResult;
use serde::Serialize;

use crate::records::percentage;
use crate::scanner::RoundGame;

/// Result distribution, read from the `Result` tag only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub unfinished: usize,
    pub white_win_percentage: f64,
    pub black_win_percentage: f64,
    pub draw_percentage: f64,
}

pub fn calculate(games: &[RoundGame<'_>]) -> Results {
    let (mut white_wins, mut black_wins, mut draws, mut unfinished) = (0, 0, 0, 0);
    for game in games {
        match game.game.result() {
            GameResult::WhiteWins => white_wins += 1,
            GameResult::BlackWins => black_wins += 1,
            GameResult::Draw => draws += 1,
            GameResult::Unfinished => unfinished += 1,
        }
    }

    let total = games.len();
    Results {
        white_wins,
        black_wins,
        draws,
        unfinished,
        white_win_percentage: percentage(white_wins, total),
        black_win_percentage: percentage(black_wins, total),
        draw_percentage: percentage(draws, total),
    }
}
