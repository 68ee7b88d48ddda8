//! Longest run of checks by one side. Quiet moves in between do not break the
//! run; only a check by the other side does.

use chess_core::moves::{color_label, full_move};
use serde::Serialize;
use shakmaty::Color;

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSequence {
    pub length: usize,
    pub start_move: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct CheckSequenceScanner {
    checker: Option<Color>,
    run: usize,
    run_start: usize,
    longest: Leader<usize, CheckSequence>,
}

impl Default for CheckSequenceScanner {
    fn default() -> Self {
        Self {
            checker: None,
            run: 0,
            run_start: 0,
            longest: Leader::highest(),
        }
    }
}

impl GameScanner for CheckSequenceScanner {
    type Output = Option<CheckSequence>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.checker = None;
        self.run = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        let mv = ctx.mv;
        if !mv.flags.check {
            return;
        }
        if self.checker == Some(mv.color) {
            self.run += 1;
        } else {
            self.checker = Some(mv.color);
            self.run = 1;
            self.run_start = ctx.ply;
        }

        let (length, start) = (self.run, self.run_start);
        self.longest.offer(length, || CheckSequence {
            length,
            start_move: full_move(start),
            color: color_label(mv.color),
            game: GameRef::of(ctx.game),
        });
    }

    fn finish(self) -> Self::Output {
        self.longest.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<CheckSequence> {
    run_scanner(CheckSequenceScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_run_survives_quiet_moves() {
        // White checks on moves 2 and 5 with quiet queen moves between.
        let games = vec![game(
            "Ann",
            "Bob",
            "*",
            &["e4", "f6", "Qh5+", "g6", "Qe2", "a6", "Qc4", "a5", "Qf7+", "Kxf7"],
        )];
        let seq = calculate(&round(&games)).unwrap();
        assert_eq!(seq.color, "White");
        assert_eq!(seq.length, 2);
        assert_eq!(seq.start_move, 2);
    }

    #[test]
    fn test_no_checks() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "e5"])];
        assert!(calculate(&round(&games)).is_none());
    }
}
