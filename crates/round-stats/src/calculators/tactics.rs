use serde::Serialize;
use shakmaty::Role;

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnPassantGame {
    pub count: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRecord {
    pub captures: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietStreak {
    /// Consecutive plies without a capture.
    pub moves: usize,
    pub start_move: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Castling {
    pub kingside: usize,
    pub queenside: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tactics {
    pub total_captures: usize,
    pub total_checks: usize,
    pub en_passant_games: Vec<EnPassantGame>,
    pub promotions: usize,
    pub underpromotions: usize,
    pub castling: Castling,
    pub bloodiest_game: Option<CaptureRecord>,
    pub quietest_game: Option<CaptureRecord>,
    pub longest_non_capture_streak: Option<QuietStreak>,
}

pub fn capture_count(game: &RoundGame<'_>) -> usize {
    game.moves().iter().filter(|m| m.is_capture()).count()
}

/// Longest run of capture-free plies as (length, starting ply).
fn quiet_streak(game: &RoundGame<'_>) -> (usize, usize) {
    let (mut best, mut best_start) = (0, 0);
    let (mut current, mut start) = (0, 0);
    for (ply, mv) in game.moves().iter().enumerate() {
        if mv.is_capture() {
            current = 0;
            continue;
        }
        if current == 0 {
            start = ply;
        }
        current += 1;
        if current > best {
            best = current;
            best_start = start;
        }
    }
    (best, best_start)
}

pub fn calculate(games: &[RoundGame<'_>]) -> Tactics {
    let mut total_captures = 0;
    let mut total_checks = 0;
    let mut promotions = 0;
    let mut underpromotions = 0;
    let mut castling = Castling::default();
    let mut en_passant_games = Vec::new();
    let mut bloodiest = Leader::highest();
    let mut quietest = Leader::lowest();
    let mut longest_quiet = Leader::highest();

    for game in games {
        let moves = game.moves();
        let captures = capture_count(game);
        total_captures += captures;
        total_checks += moves.iter().filter(|m| m.flags.check).count();
        castling.kingside += moves.iter().filter(|m| m.flags.kingside_castle).count();
        castling.queenside += moves.iter().filter(|m| m.flags.queenside_castle).count();
        for promotion in moves.iter().filter_map(|m| m.flags.promotion) {
            promotions += 1;
            if promotion != Role::Queen {
                underpromotions += 1;
            }
        }

        let en_passant = moves.iter().filter(|m| m.flags.en_passant).count();
        if en_passant > 0 {
            en_passant_games.push(EnPassantGame {
                count: en_passant,
                game: GameRef::of(game),
            });
        }

        let record = || CaptureRecord {
            captures,
            game: GameRef::of(game),
        };
        bloodiest.offer(captures, record);
        quietest.offer(captures, record);

        let (streak, start) = quiet_streak(game);
        if streak > 0 {
            longest_quiet.offer(streak, || QuietStreak {
                moves: streak,
                start_move: chess_core::moves::full_move(start),
                game: GameRef::of(game),
            });
        }
    }

    Tactics {
        total_captures,
        total_checks,
        en_passant_games,
        promotions,
        underpromotions,
        castling,
        bloodiest_game: bloodiest.into_inner(),
        quietest_game: quietest.into_inner(),
        longest_non_capture_streak: longest_quiet.into_inner(),
    }
}
