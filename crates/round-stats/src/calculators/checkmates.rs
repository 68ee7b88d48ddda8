use chess_core::moves::{color_label, full_move};
use chess_core::MoveRecord;
use serde::Serialize;

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatesByPiece {
    pub queen: usize,
    pub rook: usize,
    pub bishop: usize,
    pub knight: usize,
    pub pawn: usize,
    pub king: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastestMate {
    pub moves: u32,
    pub winner: &'static str,
    pub san: String,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkmates {
    pub total: usize,
    pub by_piece: MatesByPiece,
    pub fastest: Option<FastestMate>,
}

/// The mating ply of a game, if it ended in checkmate.
pub fn mating_move<'a>(game: &RoundGame<'a>) -> Option<(usize, &'a MoveRecord)> {
    let moves = game.moves();
    let last = moves.last()?;
    (last.flags.checkmate || last.san.ends_with('#')).then(|| (moves.len() - 1, last))
}

impl MatesByPiece {
    /// Attribute a mate by the SAN piece letter; castling mates count as `other`.
    fn record(&mut self, san: &str) {
        let slot = match san.chars().next() {
            Some('Q') => &mut self.queen,
            Some('R') => &mut self.rook,
            Some('B') => &mut self.bishop,
            Some('N') => &mut self.knight,
            Some('K') => &mut self.king,
            Some('a'..='h') => &mut self.pawn,
            _ => &mut self.other,
        };
        *slot += 1;
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> Checkmates {
    let mut by_piece = MatesByPiece::default();
    let mut total = 0;
    let mut fastest = Leader::lowest();

    for game in games {
        let Some((ply, mv)) = mating_move(game) else {
            continue;
        };
        total += 1;
        by_piece.record(&mv.san);
        let moves = full_move(ply);
        fastest.offer(moves, || FastestMate {
            moves,
            winner: color_label(mv.color),
            san: mv.san.clone(),
            game: GameRef::of(game),
        });
    }

    Checkmates {
        total,
        by_piece,
        fastest: fastest.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_fools_mate_attributed_to_queen() {
        let games = vec![
            game("Ann", "Bob", "1/2-1/2", &["e4", "e5"]),
            game("Cat", "Dan", "0-1", &["f3", "e5", "g4", "Qh4#"]),
        ];
        let mates = calculate(&round(&games));

        assert_eq!(mates.total, 1);
        assert_eq!(mates.by_piece.queen, 1);
        let fastest = mates.fastest.unwrap();
        assert_eq!(fastest.moves, 2);
        assert_eq!(fastest.winner, "Black");
        assert_eq!(fastest.san, "Qh4#");
        assert_eq!(fastest.game.game_index, 1);
    }

    #[test]
    fn test_mate_piece_letters() {
        let mut by_piece = MatesByPiece::default();
        for san in ["Rh8#", "exf7#", "O-O#", "Nf7#", "Kd2#", "Bb5#"] {
            by_piece.record(san);
        }
        assert_eq!(by_piece.rook, 1);
        assert_eq!(by_piece.pawn, 1);
        assert_eq!(by_piece.other, 1);
        assert_eq!(by_piece.knight + by_piece.king + by_piece.bishop, 3);
    }
}
