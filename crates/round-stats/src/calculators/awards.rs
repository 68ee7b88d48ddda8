use chess_core::moves::{color_label, full_move, to_full_moves};
use serde::Serialize;

use crate::calculators::checkmates::mating_move;
use crate::calculators::tactics::{capture_count, CaptureRecord};
use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeedDemon {
    pub moves: u32,
    pub winner: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndgameWizard {
    pub endgame_moves: u32,
    pub endgame_plies: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningSprinter {
    pub opening_moves: u32,
    pub opening_plies: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Awards {
    pub bloodbath: Option<CaptureRecord>,
    pub pacifist: Option<CaptureRecord>,
    pub speed_demon: Option<SpeedDemon>,
    pub endgame_wizard: Option<EndgameWizard>,
    pub opening_sprinter: Option<OpeningSprinter>,
}

pub fn calculate(games: &[RoundGame<'_>]) -> Awards {
    let mut bloodbath = Leader::highest();
    let mut pacifist = Leader::lowest();
    let mut speed_demon = Leader::lowest();
    let mut endgame_wizard = Leader::highest();
    let mut opening_sprinter = Leader::lowest();

    for game in games {
        let captures = capture_count(game);
        let record = || CaptureRecord {
            captures,
            game: GameRef::of(game),
        };
        bloodbath.offer(captures, record);
        pacifist.offer(captures, record);

        if game.game.result().is_decisive() {
            if let Some((ply, mv)) = mating_move(game) {
                let moves = full_move(ply);
                speed_demon.offer(moves, || SpeedDemon {
                    moves,
                    winner: color_label(mv.color),
                    game: GameRef::of(game),
                });
            }
        }

        let endgame = game.phases.endgame_plies();
        if endgame > 0 {
            endgame_wizard.offer(endgame, || EndgameWizard {
                endgame_moves: to_full_moves(endgame),
                endgame_plies: endgame,
                game: GameRef::of(game),
            });
        }

        let opening = game.phases.opening_plies();
        if opening > 0 {
            opening_sprinter.offer(opening, || OpeningSprinter {
                opening_moves: to_full_moves(opening),
                opening_plies: opening,
                game: GameRef::of(game),
            });
        }
    }

    Awards {
        bloodbath: bloodbath.into_inner(),
        pacifist: pacifist.into_inner(),
        speed_demon: speed_demon.into_inner(),
        endgame_wizard: endgame_wizard.into_inner(),
        opening_sprinter: opening_sprinter.into_inner(),
    }
}
