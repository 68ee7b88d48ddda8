//! Move-stream primitives shared by every calculator.

use std::collections::HashMap;

use serde::Serialize;
use shakmaty::{Color, File, Rank, Role, Square};

use crate::game_data::{MoveRecord, ParsedGame};

/// Full move number of a 0-indexed ply.
pub fn full_move(ply: usize) -> u32 {
    (ply / 2) as u32 + 1
}

/// Side to move at a 0-indexed ply.
pub fn ply_color(ply: usize) -> Color {
    if ply % 2 == 0 {
        Color::White
    } else {
        Color::Black
    }
}

/// Ply count expressed in full moves, rounding a trailing White ply up.
pub fn to_full_moves(plies: usize) -> u32 {
    plies.div_ceil(2) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerNames {
    pub white: String,
    pub black: String,
}

pub fn player_names(game: &ParsedGame) -> PlayerNames {
    PlayerNames {
        white: game.white_name().to_string(),
        black: game.black_name().to_string(),
    }
}

pub fn color_label(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

pub fn color_key(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}

/// Conventional material value in pawns.
pub fn material_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

/// a1 is dark: file index plus rank number is odd.
pub fn is_dark_square(sq: Square) -> bool {
    (sq.file() as u32 + sq.rank() as u32) % 2 == 0
}

pub fn is_light_square(sq: Square) -> bool {
    !is_dark_square(sq)
}

pub fn is_edge_file(sq: Square) -> bool {
    matches!(sq.file(), File::A | File::H)
}

pub fn is_center_square(sq: Square) -> bool {
    matches!(sq.file(), File::D | File::E) && matches!(sq.rank(), Rank::Fourth | Rank::Fifth)
}

pub fn home_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

/// Moves of a game restricted to a ply range, clamped to the game length.
pub fn moves_in_range(moves: &[MoveRecord], start: usize, end: usize) -> &[MoveRecord] {
    let end = end.min(moves.len());
    let start = start.min(end);
    &moves[start..end]
}

/// A piece instance is identified by the square it started the game on.
pub type PieceId = Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedMove {
    pub piece: Option<PieceId>,
    pub captured: Option<PieceId>,
}

/// Follows piece instances through a game so stats can attribute moves to
/// "the g1 knight" rather than "a knight".
#[derive(Debug, Clone)]
pub struct PieceTracker {
    occupants: HashMap<Square, PieceId>,
}

impl Default for PieceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceTracker {
    pub fn new() -> Self {
        let occupants = (0..64u32)
            .map(Square::new)
            .filter(|sq| {
                matches!(
                    sq.rank(),
                    Rank::First | Rank::Second | Rank::Seventh | Rank::Eighth
                )
            })
            .map(|sq| (sq, sq))
            .collect();
        Self { occupants }
    }

    pub fn occupant(&self, sq: Square) -> Option<PieceId> {
        self.occupants.get(&sq).copied()
    }

    pub fn apply(&mut self, mv: &MoveRecord) -> TrackedMove {
        let captured = if mv.flags.en_passant {
            self.occupants
                .remove(&Square::from_coords(mv.to.file(), mv.from.rank()))
        } else if mv.captured.is_some() {
            self.occupants.remove(&mv.to)
        } else {
            None
        };

        let piece = self.occupants.remove(&mv.from);
        if let Some(id) = piece {
            self.occupants.insert(mv.to, id);
        }

        if mv.flags.is_castle() {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.flags.kingside_castle {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            if let Some(rook) = self.occupants.remove(&Square::from_coords(rook_from, rank)) {
                self.occupants.insert(Square::from_coords(rook_to, rank), rook);
            }
        }

        TrackedMove { piece, captured }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::replay_san;

    #[test]
    fn test_full_move_and_color() {
        for ply in 0..200 {
            assert_eq!(full_move(ply), (ply / 2) as u32 + 1);
            let expected = if ply % 2 == 0 { Color::White } else { Color::Black };
            assert_eq!(ply_color(ply), expected);
        }
        assert_eq!(full_move(38), 20);
    }

    #[test]
    fn test_to_full_moves_rounds_up() {
        assert_eq!(to_full_moves(0), 0);
        assert_eq!(to_full_moves(7), 4);
        assert_eq!(to_full_moves(8), 4);
    }

    #[test]
    fn test_square_colors() {
        assert!(is_dark_square(Square::A1));
        assert!(is_light_square(Square::H1));
        assert!(is_light_square(Square::D5));
        assert!(is_dark_square(Square::E5));
        assert!(is_center_square(Square::E4));
        assert!(!is_center_square(Square::C4));
    }

    #[test]
    fn test_tracker_follows_castling_rook() {
        let moves = replay_san(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]).unwrap();
        let mut tracker = PieceTracker::new();
        for mv in &moves {
            tracker.apply(mv);
        }
        assert_eq!(tracker.occupant(Square::F1), Some(Square::H1));
        assert_eq!(tracker.occupant(Square::G1), Some(Square::E1));
        assert_eq!(tracker.occupant(Square::F3), Some(Square::G1));
    }

    #[test]
    fn test_tracker_reports_captured_instance() {
        let moves = replay_san(&["e4", "d5", "exd5"]).unwrap();
        let mut tracker = PieceTracker::new();
        tracker.apply(&moves[0]);
        tracker.apply(&moves[1]);
        let tracked = tracker.apply(&moves[2]);
        assert_eq!(tracked.piece, Some(Square::E2));
        assert_eq!(tracked.captured, Some(Square::D7));
    }
}
