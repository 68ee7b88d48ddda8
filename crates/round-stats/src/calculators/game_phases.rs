use chess_core::moves::to_full_moves;
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    pub moves: u32,
    pub plies: usize,
    /// "White vs Black" label.
    #[serde(rename = "game")]
    pub game_label: String,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePhaseStats {
    /// Averages in full moves.
    pub average_opening: f64,
    pub average_middlegame: f64,
    pub average_endgame: f64,
    pub longest_opening: Option<PhaseRecord>,
    pub longest_middlegame: Option<PhaseRecord>,
    pub longest_endgame: Option<PhaseRecord>,
}

pub fn calculate(games: &[RoundGame<'_>]) -> GamePhaseStats {
    let mut longest_opening = Leader::highest();
    let mut longest_middlegame = Leader::highest();
    let mut longest_endgame = Leader::highest();
    let (mut opening_sum, mut middlegame_sum, mut endgame_sum) = (0, 0, 0);

    for game in games {
        let phases = &game.phases;
        opening_sum += phases.opening_plies();
        middlegame_sum += phases.middlegame_plies();
        endgame_sum += phases.endgame_plies();

        let record = |plies: usize| PhaseRecord {
            moves: to_full_moves(plies),
            plies,
            game_label: format!("{} vs {}", game.game.white_name(), game.game.black_name()),
            game: GameRef::of(game),
        };
        offer_nonzero(&mut longest_opening, phases.opening_plies(), record);
        offer_nonzero(&mut longest_middlegame, phases.middlegame_plies(), record);
        offer_nonzero(&mut longest_endgame, phases.endgame_plies(), record);
    }

    let average = |sum: usize| {
        if games.is_empty() {
            0.0
        } else {
            sum as f64 / games.len() as f64 / 2.0
        }
    };

    GamePhaseStats {
        average_opening: average(opening_sum),
        average_middlegame: average(middlegame_sum),
        average_endgame: average(endgame_sum),
        longest_opening: longest_opening.into_inner(),
        longest_middlegame: longest_middlegame.into_inner(),
        longest_endgame: longest_endgame.into_inner(),
    }
}

fn offer_nonzero(
    leader: &mut Leader<usize, PhaseRecord>,
    plies: usize,
    record: impl Fn(usize) -> PhaseRecord,
) {
    if plies > 0 {
        leader.offer(plies, || record(plies));
    }
}
