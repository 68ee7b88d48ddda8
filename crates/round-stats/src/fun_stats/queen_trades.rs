//! When both queens have left the board.

use chess_core::moves::full_move;
use serde::Serialize;
use shakmaty::{Color, Role};

use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueenTrade {
    /// Full move on which the second queen was captured.
    pub moves: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueenTrades {
    pub fastest: Option<QueenTrade>,
    pub slowest: Option<QueenTrade>,
}

pub struct QueenTradeScanner {
    white_queen_lost: bool,
    black_queen_lost: bool,
    traded_at: Option<usize>,
    fastest: Leader<usize, QueenTrade>,
    slowest: Leader<usize, QueenTrade>,
}

impl Default for QueenTradeScanner {
    fn default() -> Self {
        Self {
            white_queen_lost: false,
            black_queen_lost: false,
            traded_at: None,
            fastest: Leader::lowest(),
            slowest: Leader::highest(),
        }
    }
}

impl GameScanner for QueenTradeScanner {
    type Output = QueenTrades;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.white_queen_lost = false;
        self.black_queen_lost = false;
        self.traded_at = None;
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if self.traded_at.is_some() || ctx.mv.captured != Some(Role::Queen) {
            return;
        }
        match ctx.mv.color {
            Color::White => self.black_queen_lost = true,
            Color::Black => self.white_queen_lost = true,
        }
        if self.white_queen_lost && self.black_queen_lost {
            self.traded_at = Some(ctx.ply);
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        let Some(ply) = self.traded_at else {
            return;
        };
        let record = || QueenTrade {
            moves: full_move(ply),
            game: GameRef::of(game),
        };
        self.fastest.offer(ply, record);
        self.slowest.offer(ply, record);
    }

    fn finish(self) -> QueenTrades {
        QueenTrades {
            fastest: self.fastest.into_inner(),
            slowest: self.slowest.into_inner(),
        }
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> QueenTrades {
    run_scanner(QueenTradeScanner::default(), games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_fastest_and_slowest_trade() {
        let early = ["d4", "e5", "dxe5", "d6", "exd6", "Qxd6", "Qxd6", "cxd6"];
        let late = ["e4", "e5", "Nf3", "Nc6", "d4", "exd4", "Nxd4", "Nxd4", "Qxd4", "Qf6", "Qxf6", "Nxf6"];
        let games = vec![
            game("Ann", "Bob", "*", &late),
            game("Cat", "Dan", "*", &early),
            game("Eve", "Fay", "*", &["e4", "e5"]),
        ];
        let trades = calculate(&round(&games));

        let fastest = trades.fastest.unwrap();
        assert_eq!((fastest.moves, fastest.game.game_index), (4, 1));
        let slowest = trades.slowest.unwrap();
        assert_eq!((slowest.moves, slowest.game.game_index), (6, 0));
    }
}
