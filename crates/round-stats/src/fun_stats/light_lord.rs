//! Most captures landing on light squares by one side in one game.

use chess_core::moves::{color_label, is_light_square};
use serde::Serialize;

use super::SideTally;
use crate::records::GameRef;
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightLord {
    pub captures: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Default)]
pub struct LightLordScanner {
    tally: SideTally,
}

impl GameScanner for LightLordScanner {
    type Output = Option<LightLord>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if ctx.mv.is_capture() && is_light_square(ctx.mv.to) {
            self.tally.bump(ctx.mv.color);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        self.tally.finish_game(game);
    }

    fn finish(self) -> Self::Output {
        self.tally.into_inner().map(|best| LightLord {
            captures: best.count,
            color: color_label(best.color),
            game: best.game,
        })
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<LightLord> {
    run_scanner(LightLordScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_white_wins_tie_within_game() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "d5", "exd5", "Qxd5"])];
        let round = round(&games);
        let light = calculate(&round).unwrap();
        assert_eq!(light.captures, 1);
        assert_eq!(light.color, "White");
        assert!(crate::fun_stats::dark_lord::calculate(&round).is_none());
    }
}
