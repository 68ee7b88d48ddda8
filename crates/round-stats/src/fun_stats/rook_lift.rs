//! Earliest rook to leave its home rank.

use chess_core::moves::{color_label, full_move, home_rank};
use serde::Serialize;
use shakmaty::Role;

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RookLift {
    pub moves: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct RookLiftScanner {
    earliest: Leader<u32, RookLift>,
}

impl Default for RookLiftScanner {
    fn default() -> Self {
        Self {
            earliest: Leader::lowest(),
        }
    }
}

impl GameScanner for RookLiftScanner {
    type Output = Option<RookLift>;

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        let mv = ctx.mv;
        let home = home_rank(mv.color);
        if mv.piece != Role::Rook || mv.from.rank() != home || mv.to.rank() == home {
            return;
        }
        let moves = full_move(ctx.ply);
        self.earliest.offer(moves, || RookLift {
            moves,
            color: color_label(mv.color),
            game: GameRef::of(ctx.game),
        });
    }

    fn finish(self) -> Self::Output {
        self.earliest.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<RookLift> {
    run_scanner(RookLiftScanner::default(), games)
}
