//! The piece instance that visited the most distinct squares in one game.

use std::collections::{BTreeMap, BTreeSet};

use chess_core::moves::{color_label, role_name, PieceId};
use serde::Serialize;
use shakmaty::{File, Role, Square};

use super::{role_after, starting_piece};
use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareTourist {
    /// Distinct squares, the starting square included.
    pub squares: usize,
    pub piece: &'static str,
    pub color: &'static str,
    pub start_square: String,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct SquareTouristScanner {
    visited: BTreeMap<PieceId, BTreeSet<Square>>,
    /// Current role of each piece that has moved.
    roles: BTreeMap<PieceId, Role>,
    most: Leader<usize, SquareTourist>,
}

impl Default for SquareTouristScanner {
    fn default() -> Self {
        Self {
            visited: BTreeMap::new(),
            roles: BTreeMap::new(),
            most: Leader::highest(),
        }
    }
}

impl SquareTouristScanner {
    fn visit(&mut self, id: PieceId, to: Square) {
        self.visited
            .entry(id)
            .or_insert_with(|| BTreeSet::from([id]))
            .insert(to);
    }
}

impl GameScanner for SquareTouristScanner {
    type Output = Option<SquareTourist>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.visited.clear();
        self.roles.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        if let Some(id) = ctx.tracked.piece {
            self.visit(id, ctx.mv.to);
            self.roles.insert(id, role_after(ctx.mv));
        }
        if ctx.mv.flags.is_castle() {
            let rank = ctx.mv.from.rank();
            let (from, to) = if ctx.mv.flags.kingside_castle {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            self.visit(Square::from_coords(from, rank), Square::from_coords(to, rank));
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        for (id, squares) in &self.visited {
            let Some(piece) = starting_piece(*id) else {
                continue;
            };
            let count = squares.len();
            let role = self.roles.get(id).copied().unwrap_or(piece.role);
            self.most.offer(count, || SquareTourist {
                squares: count,
                piece: role_name(role),
                color: color_label(piece.color),
                start_square: id.to_string(),
                game: GameRef::of(game),
            });
        }
    }

    fn finish(self) -> Self::Output {
        self.most.into_inner()
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Option<SquareTourist> {
    run_scanner(SquareTouristScanner::default(), games)
}
