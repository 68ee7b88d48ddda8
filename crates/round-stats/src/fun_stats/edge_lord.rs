//! Most moves from or to the a- or h-file by one side in one game.

use chess_core::moves::{color_label, is_edge_file};
use serde::Serialize;

use super::SideTally;
use crate::records::GameRef;
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLord {
    pub moves: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Default)]
pub struct EdgeLordScanner {
    tally: SideTally,
}

impl GameScanner for EdgeLordScanner {
    type Output = Option<EdgeLord>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if [ctx.mv.from, ctx.mv.to].into_iter().any(is_edge_file) {
            self.tally.bump(ctx.mv.color);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        self.tally.finish_game(game);
    }

    fn finish(self) -> Self::Output {
        self.tally.into_inner().map(|best| EdgeLord {
            moves: best.count,
            color: color_label(best.color),
            game: best.game,
        })
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<EdgeLord> {
    run_scanner(EdgeLordScanner::default(), games)
}
