//! Longest run of consecutive capturing plies.

use chess_core::moves::full_move;
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSequence {
    pub length: usize,
    pub start_move: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct CaptureSequenceScanner {
    run: usize,
    run_start: usize,
    longest: Leader<usize, CaptureSequence>,
}

impl Default for CaptureSequenceScanner {
    fn default() -> Self {
        Self {
            run: 0,
            run_start: 0,
            longest: Leader::highest(),
        }
    }
}

impl GameScanner for CaptureSequenceScanner {
    type Output = Option<CaptureSequence>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.run = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if !ctx.mv.is_capture() {
            self.run = 0;
            return;
        }
        if self.run == 0 {
            self.run_start = ctx.ply;
        }
        self.run += 1;

        let (length, start) = (self.run, self.run_start);
        self.longest.offer(length, || CaptureSequence {
            length,
            start_move: full_move(start),
            game: GameRef::of(ctx.game),
        });
    }

    fn finish(self) -> Self::Output {
        self.longest.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<CaptureSequence> {
    run_scanner(CaptureSequenceScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_trade_sequence() {
        let games = vec![game(
            "Ann",
            "Bob",
            "*",
            &["e4", "d5", "exd5", "Qxd5", "Nc3", "Qxd2+", "Bxd2"],
        )];
        let seq = calculate(&round(&games)).unwrap();
        assert_eq!(seq.length, 2);
        assert_eq!(seq.start_move, 2);
    }
}
