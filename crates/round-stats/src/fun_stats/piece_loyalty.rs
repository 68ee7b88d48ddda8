//! The piece that waited longest on its starting square before first moving.

use std::collections::HashMap;

use chess_core::moves::{color_label, role_name, PieceId};
use serde::Serialize;
use shakmaty::{File, Square};

use super::starting_piece;
use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

/// Plies a piece must stay put before the record is worth reporting.
pub const MIN_LOYALTY_PLIES: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceLoyalty {
    /// Plies spent on the starting square.
    pub moves: usize,
    pub piece: &'static str,
    pub square: String,
    pub color: &'static str,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct PieceLoyaltyScanner {
    /// Ply at which each piece first moved or was captured.
    departed: HashMap<PieceId, usize>,
    most: Leader<usize, PieceLoyalty>,
}

impl Default for PieceLoyaltyScanner {
    fn default() -> Self {
        Self {
            departed: HashMap::new(),
            most: Leader::highest(),
        }
    }
}

impl GameScanner for PieceLoyaltyScanner {
    type Output = Option<PieceLoyalty>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.departed.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        let mut leave = |id: Option<PieceId>| {
            if let Some(id) = id {
                self.departed.entry(id).or_insert(ctx.ply);
            }
        };
        leave(ctx.tracked.piece);
        leave(ctx.tracked.captured);
        if ctx.mv.flags.is_castle() {
            let file = if ctx.mv.flags.kingside_castle { File::H } else { File::A };
            leave(Some(Square::from_coords(file, ctx.mv.from.rank())));
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        let total = game.moves().len();
        for id in (0..64u32).map(Square::new) {
            let Some(piece) = starting_piece(id) else {
                continue;
            };
            let stayed = self.departed.get(&id).copied().unwrap_or(total);
            self.most.offer(stayed, || PieceLoyalty {
                moves: stayed,
                piece: role_name(piece.role),
                square: id.to_string(),
                color: color_label(piece.color),
                game: GameRef::of(game),
            });
        }
    }

    fn finish(self) -> Self::Output {
        self.most
            .into_inner()
            .filter(|loyalty| loyalty.moves >= MIN_LOYALTY_PLIES)
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<PieceLoyalty> {
    run_scanner(PieceLoyaltyScanner::default(), games)
}
