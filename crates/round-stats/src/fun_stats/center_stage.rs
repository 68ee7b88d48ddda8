//! The piece instance that landed on d4, d5, e4 or e5 most often.

use std::collections::BTreeMap;

use chess_core::moves::{color_label, is_center_square, role_name, PieceId};
use serde::Serialize;
use shakmaty::Role;

use super::{role_after, starting_piece};
use crate::records::{GameRef, Leader};
use crate::scanner::{run_scanner, GameScanner, MoveContext, RoundGame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterStage {
    pub moves: u32,
    pub piece: &'static str,
    pub color: &'static str,
    pub start_square: String,
    #[serde(flatten)]
    pub game: GameRef,
}

pub struct CenterStageScanner {
    landings: BTreeMap<PieceId, u32>,
    /// Role after each piece's latest move.
    roles: BTreeMap<PieceId, Role>,
    most: Leader<u32, CenterStage>,
}

impl Default for CenterStageScanner {
    fn default() -> Self {
        Self {
            landings: BTreeMap::new(),
            roles: BTreeMap::new(),
            most: Leader::highest(),
        }
    }
}

impl GameScanner for CenterStageScanner {
    type Output = Option<CenterStage>;

    fn start_game(&mut self, _game: &RoundGame<'_>) {
        self.landings.clear();
        self.roles.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext<'_>) {
        let Some(id) = ctx.tracked.piece else {
            return;
        };
        self.roles.insert(id, role_after(ctx.mv));
        if is_center_square(ctx.mv.to) {
            *self.landings.entry(id).or_insert(0) += 1;
        }
    }

    fn finish_game(&mut self, game: &RoundGame<'_>) {
        for (&id, &moves) in &self.landings {
            let Some(piece) = starting_piece(id) else {
                continue;
            };
            let role = self.roles.get(&id).copied().unwrap_or(piece.role);
            self.most.offer(moves, || CenterStage {
                moves,
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

pub fn calculate(games: &[RoundGame<'_>]) -> Option<CenterStage> {
    run_scanner(CenterStageScanner::default(), games)
}
