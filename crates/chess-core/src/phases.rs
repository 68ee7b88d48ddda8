//! Opening / middlegame / endgame boundaries from material and development.
//!
//! The opening ends once both sides have developed, once enough pieces have
//! come off, or at a fixed ply ceiling, whichever comes first. The endgame
//! begins once few enough non-pawn pieces remain. Boundaries are ply counts,
//! so `moves[..opening_end]` is the opening.

use serde::Serialize;
use shakmaty::{Color, Role, Square};

use crate::game_data::{MoveRecord, ParsedGame};

const WHITE_MINOR_HOMES: [Square; 4] = [Square::B1, Square::G1, Square::C1, Square::F1];
const BLACK_MINOR_HOMES: [Square; 4] = [Square::B8, Square::G8, Square::C8, Square::F8];

/// Knights, bishops, rooks and queens on the starting board.
const STARTING_PIECES: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseConfig {
    /// Minor pieces developed (castling counts as one) each side needs to leave the opening.
    pub min_developed: usize,
    /// The opening never lasts longer than this many plies.
    pub opening_ply_ceiling: usize,
    /// Non-pawn, non-king pieces at or below which the middlegame has started.
    pub middlegame_material: u32,
    /// Non-pawn, non-king pieces at or below which the endgame has started.
    pub endgame_material: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            min_developed: 3,
            opening_ply_ceiling: 30,
            middlegame_material: 10,
            endgame_material: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Opening,
    Middlegame,
    Endgame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePhases {
    pub opening_end: usize,
    pub middlegame_end: usize,
    pub total_plies: usize,
}

impl GamePhases {
    pub fn opening_plies(&self) -> usize {
        self.opening_end
    }

    pub fn middlegame_plies(&self) -> usize {
        self.middlegame_end - self.opening_end
    }

    pub fn endgame_plies(&self) -> usize {
        self.total_plies - self.middlegame_end
    }

    pub fn phase_of(&self, ply: usize) -> Phase {
        if ply < self.opening_end {
            Phase::Opening
        } else if ply < self.middlegame_end {
            Phase::Middlegame
        } else {
            Phase::Endgame
        }
    }
}

#[derive(Default)]
struct Development {
    minors: Vec<Square>,
    castled: bool,
}

impl Development {
    fn count(&self) -> usize {
        self.minors.len() + usize::from(self.castled)
    }

    fn record(&mut self, mv: &MoveRecord) {
        if mv.flags.is_castle() {
            self.castled = true;
            return;
        }
        let homes = match mv.color {
            Color::White => &WHITE_MINOR_HOMES,
            Color::Black => &BLACK_MINOR_HOMES,
        };
        if matches!(mv.piece, Role::Knight | Role::Bishop)
            && homes.contains(&mv.from)
            && !self.minors.contains(&mv.from)
        {
            self.minors.push(mv.from);
        }
    }
}

/// Phase boundaries of an already replayed game. Takes the move records
/// rather than PGN text; parse first, or use [`segment_game`].
pub fn segment(moves: &[MoveRecord], config: &PhaseConfig) -> GamePhases {
    let total_plies = moves.len();
    let mut white = Development::default();
    let mut black = Development::default();
    let mut pieces = STARTING_PIECES;
    let mut opening_end = None;
    let mut middlegame_end = None;

    for (ply, mv) in moves.iter().enumerate() {
        match mv.color {
            Color::White => white.record(mv),
            Color::Black => black.record(mv),
        }
        if mv.captured.is_some_and(|role| !matches!(role, Role::Pawn | Role::King)) {
            pieces = pieces.saturating_sub(1);
        }
        if mv.flags.promotion.is_some_and(|role| role != Role::Pawn) {
            pieces += 1;
        }

        let played = ply + 1;
        if opening_end.is_none() {
            let developed = white.count() >= config.min_developed && black.count() >= config.min_developed;
            if developed || pieces <= config.middlegame_material || played >= config.opening_ply_ceiling {
                opening_end = Some(played);
            }
        }
        if pieces <= config.endgame_material {
            opening_end.get_or_insert(played);
            middlegame_end = Some(played);
            break;
        }
    }

    let opening_end = opening_end.unwrap_or(total_plies);
    GamePhases {
        opening_end,
        middlegame_end: middlegame_end.unwrap_or(total_plies).max(opening_end),
        total_plies,
    }
}

/// Segment with the default thresholds.
pub fn segment_game(game: &ParsedGame) -> GamePhases {
    segment(&game.moves, &PhaseConfig::default())
}
