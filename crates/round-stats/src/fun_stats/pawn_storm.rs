//! Most pawn moves played inside the opening phase of one game.

use chess_core::Phase;
use serde::Serialize;
use shakmaty::Role;

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PawnStorm {
    pub count: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct PawnStormScanner {
    count: usize,
    most: Leader<usize, PawnStorm>,
}

impl Default for PawnStormScanner {
    fn default() -> Self {
        Self {
            count: 0,
            most: Leader::highest(),
        }
    }
}

impl GameScanner for PawnStormScanner {
    type Output = Option<PawnStorm>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.count = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if ctx.phase == Phase::Opening && ctx.mv.piece == Role::Pawn {
            self.count += 1;
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        let count = self.count;
        if count > 0 {
            self.most.offer(count, || PawnStorm {
                count,
                game: GameRef::of(game),
            });
        }
    }

    fn finish(self) -> Self::Output {
        self.most.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<PawnStorm> {
    run_scanner(PawnStormScanner::default(), games)
}
