//! Most king moves by one side in one game. Castling counts as a king move.

use chess_core::moves::color_label;
use serde::Serialize;
use shakmaty::Role;

use super::SideTally;
use crate::records::GameRef;
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DadbodShuffler {
    pub moves: u32,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Default)]
pub struct DadbodShufflerScanner {
    tally: SideTally,
}

impl GameScanner for DadbodShufflerScanner {
    type Output = Option<DadbodShuffler>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if ctx.mv.piece == Role::King {
            self.tally.bump(ctx.mv.color);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        self.tally.finish_game(game);
    }

    fn finish(self) -> Self::Output {
        self.tally.into_inner().map(|best| DadbodShuffler {
            moves: best.count,
            color: color_label(best.color),
            game: best.game,
        })
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<DadbodShuffler> {
    run_scanner(DadbodShufflerScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    const SHUFFLE: [&str; 8] = ["e4", "e5", "Ke2", "Ke7", "Ke1", "Ke8", "Ke2", "Ke7"];

    #[test]
    fn test_most_king_moves_first_game_wins_tie() {
        let games = vec![
            game("Ann", "Bob", "*", &["e4", "e5", "Ke2", "Ke7", "Kd3"]),
            game("Cat", "Dan", "*", &SHUFFLE),
            game("Eve", "Fay", "*", &SHUFFLE),
        ];
        let shuffler = calculate(&round(&games)).unwrap();
        assert_eq!(shuffler.moves, 3);
        assert_eq!(shuffler.color, "White");
        assert_eq!(shuffler.game.game_index, 1);
        assert_eq!(shuffler.game.white, "Cat");
    }

    #[test]
    fn test_counts_each_side_separately() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "e5", "Nf3", "Ke7", "Nc3", "Ke8"])];
        let shuffler = calculate(&round(&games)).unwrap();
        assert_eq!(shuffler.moves, 2);
        assert_eq!(shuffler.color, "Black");

        let quiet = vec![game("Ann", "Bob", "*", &["e4", "e5"])];
        assert!(calculate(&round(&quiet)).is_none());
    }
}
