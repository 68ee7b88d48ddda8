//! The queen that covered the most ground, in Manhattan distance.

use std::collections::BTreeMap;

use chess_core::moves::{color_label, PieceId};
use serde::Serialize;
use shakmaty::{Color, Role};

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportyQueen {
    pub distance: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct SportyQueenScanner {
    /// Promoted queens are tracked under their pawn's starting square.
    travelled: BTreeMap<PieceId, (u32, Color)>,
    furthest: Leader<u32, SportyQueen>,
}

impl Default for SportyQueenScanner {
    fn default() -> Self {
        Self {
            travelled: BTreeMap::new(),
            furthest: Leader::highest(),
        }
    }
}

impl GameScanner for SportyQueenScanner {
    type Output = Option<SportyQueen>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.travelled.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        let mv = ctx.mv;
        let (Role::Queen, Some(id)) = (mv.piece, ctx.tracked.piece) else {
            return;
        };
        let files = (mv.from.file() as i32 - mv.to.file() as i32).unsigned_abs();
        let ranks = (mv.from.rank() as i32 - mv.to.rank() as i32).unsigned_abs();
        self.travelled.entry(id).or_insert((0, mv.color)).0 += files + ranks;
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        for &(distance, color) in self.travelled.values() {
            self.furthest.offer(distance, || SportyQueen {
                distance,
                color: color_label(color),
                game: GameRef::of(game),
            });
        }
    }

    fn finish(self) -> Self::Output {
        self.furthest.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<SportyQueen> {
    run_scanner(SportyQueenScanner::default(), games)
}
