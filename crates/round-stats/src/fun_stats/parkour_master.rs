//! Most knight moves by one side in one game.

use chess_core::moves::color_label;
use serde::Serialize;
use shakmaty::Role;

use super::SideTally;
use crate::records::GameRef;
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkourMaster {
    pub knight_moves: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Default)]
pub struct ParkourMasterScanner {
    tally: SideTally,
}

impl GameScanner for ParkourMasterScanner {
    type Output = Option<ParkourMaster>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if ctx.mv.piece == Role::Knight {
            self.tally.bump(ctx.mv.color);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        self.tally.finish_game(game);
    }

    fn finish(self) -> Self::Output {
        self.tally.into_inner().map(|best| ParkourMaster {
            knight_moves: best.count,
            color: color_label(best.color),
            game: best.game,
        })
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<ParkourMaster> {
    run_scanner(ParkourMasterScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_counts_knight_moves_per_side() {
        let games = vec![
            game("Ann", "Bob", "*", &["e4", "e5"]),
            game("Cat", "Dan", "*", &["Nf3", "Nf6", "Ng1", "Ng8", "Nc3"]),
        ];
        let parkour = calculate(&round(&games)).unwrap();
        assert_eq!(parkour.knight_moves, 3);
        assert_eq!(parkour.color, "White");
        assert_eq!(parkour.game.game_index, 1);

        let json = serde_json::to_value(&parkour).unwrap();
        assert_eq!(json["knightMoves"], 3);
        assert_eq!(json["white"], "Cat");
    }
}
