//! Earliest castle across the round.

use chess_core::moves::{color_key, full_move};
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastlingRace {
    pub moves: u32,
    /// `"white"` or `"black"`.
    pub winner: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct CastlingRaceScanner {
    earliest: Leader<u32, CastlingRace>,
}

impl Default for CastlingRaceScanner {
    fn default() -> Self {
        Self {
            earliest: Leader::lowest(),
        }
    }
}

impl GameScanner for CastlingRaceScanner {
    type Output = Option<CastlingRace>;

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if !ctx.mv.flags.is_castle() {
            return;
        }
        let moves = full_move(ctx.ply);
        self.earliest.offer(moves, || CastlingRace {
            moves,
            winner: color_key(ctx.mv.color),
            game: GameRef::of(ctx.game),
        });
    }

    fn finish(self) -> Self::Output {
        self.earliest.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<CastlingRace> {
    run_scanner(CastlingRaceScanner::default(), games)
}
