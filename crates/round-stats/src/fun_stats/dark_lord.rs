//! Most captures landing on dark squares by one side in one game.

use chess_core::moves::{color_label, is_dark_square};
use serde::Serialize;

use super::SideTally;
use crate::records::GameRef;
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DarkLord {
    pub captures: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Default)]
pub struct DarkLordScanner {
    tally: SideTally,
}

impl GameScanner for DarkLordScanner {
    type Output = Option<DarkLord>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if ctx.mv.is_capture() && is_dark_square(ctx.mv.to) {
            self.tally.bump(ctx.mv.color);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        self.tally.finish_game(game);
    }

    fn finish(self) -> Self::Output {
        self.tally.into_inner().map(|best| DarkLord {
            captures: best.count,
            color: color_label(best.color),
            game: best.game,
        })
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<DarkLord> {
    run_scanner(DarkLordScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    /// Black's bishop takes the rook on h1, a light square.
    const LIGHT_CAPTURE: [&str; 6] = ["g4", "b6", "Nf3", "Bb7", "Ng1", "Bxh1"];
    /// Black's bishop takes the rook on a1.
    const A1_CAPTURE: [&str; 6] = ["b4", "g6", "Nc3", "Bg7", "Nb1", "Bxa1"];
    /// White's bishop takes the rook on h8.
    const H8_CAPTURE: [&str; 5] = ["b3", "g6", "Bb2", "Nh6", "Bxh8"];

    #[test]
    fn test_corner_captures_are_dark() {
        let games = vec![
            game("Ann", "Bob", "*", &LIGHT_CAPTURE),
            game("Cat", "Dan", "*", &A1_CAPTURE),
            game("Eve", "Fay", "*", &H8_CAPTURE),
        ];
        let lord = calculate(&round(&games)).unwrap();
        assert_eq!(lord.captures, 1);
        assert_eq!(lord.color, "Black");
        assert_eq!(lord.game.game_index, 1);

        let white_only = vec![game("Eve", "Fay", "*", &H8_CAPTURE)];
        let lord = calculate(&round(&white_only)).unwrap();
        assert_eq!(lord.color, "White");
    }

    #[test]
    fn test_light_square_captures_do_not_count() {
        let games = vec![game("Ann", "Bob", "*", &LIGHT_CAPTURE)];
        assert!(calculate(&round(&games)).is_none());
    }
}
