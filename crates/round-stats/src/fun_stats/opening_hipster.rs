//! Most obscure named opening of the round.

use chess_core::openings::{obscurity_score, HIPSTER_PLIES};
use chess_core::OpeningBook;
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHipster {
    pub eco: String,
    pub name: String,
    /// The first six SAN moves that were classified.
    pub moves: String,
    pub obscurity_score: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Games shorter than six plies are not classified.
pub fn calculate(games: &[RoundGame<'_>]) -> Option<OpeningHipster> {
    let book = OpeningBook::standard();
    let mut most_obscure = Leader::highest();

    for game in games {
        let moves = game.moves();
        if moves.len() < HIPSTER_PLIES {
            continue;
        }
        let sequence = moves[..HIPSTER_PLIES]
            .iter()
            .map(|m| m.san.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let Some(opening) = book.classify(&sequence) else {
            continue;
        };
        let score = obscurity_score(&opening);
        most_obscure.offer(score, || OpeningHipster {
            eco: opening.eco.clone(),
            name: opening.name.clone(),
            moves: sequence.clone(),
            obscurity_score: score,
            game: GameRef::of(game),
        });
    }

    most_obscure.into_inner()
}
