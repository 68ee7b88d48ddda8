//! "Fun" records: one independent scanner per stat, each reduced across the
//! round with first-seen tie-breaking. A stat with no qualifying game is `null`.

pub mod capture_sequence;
pub mod castling_race;
pub mod center_stage;
pub mod check_sequence;
pub mod dadbod_shuffler;
pub mod dark_lord;
pub mod edge_lord;
pub mod light_lord;
pub mod opening_hipster;
pub mod parkour_master;
pub mod pawn_storm;
pub mod piece_loyalty;
pub mod queen_trades;
pub mod rook_lift;
pub mod sporty_queen;
pub mod square_tourist;

use chess_core::moves::PieceId;
use chess_core::MoveRecord;
use serde::Serialize;
use shakmaty::{Board, Color, Piece, Role};

use crate::records::{GameRef, Leader};
use crate::scanner::RoundGame;

pub use capture_sequence::CaptureSequence;
pub use castling_race::CastlingRace;
pub use center_stage::CenterStage;
pub use check_sequence::CheckSequence;
pub use dadbod_shuffler::DadbodShuffler;
pub use dark_lord::DarkLord;
pub use edge_lord::EdgeLord;
pub use light_lord::LightLord;
pub use opening_hipster::OpeningHipster;
pub use parkour_master::ParkourMaster;
pub use pawn_storm::PawnStorm;
pub use piece_loyalty::PieceLoyalty;
pub use queen_trades::QueenTrade;
pub use rook_lift::RookLift;
pub use sporty_queen::SportyQueen;
pub use square_tourist::SquareTourist;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunStats {
    pub fastest_queen_trade: Option<QueenTrade>,
    pub slowest_queen_trade: Option<QueenTrade>,
    pub longest_capture_sequence: Option<CaptureSequence>,
    pub longest_check_sequence: Option<CheckSequence>,
    pub pawn_storm: Option<PawnStorm>,
    pub piece_loyalty: Option<PieceLoyalty>,
    pub square_tourist: Option<SquareTourist>,
    pub castling_race: Option<CastlingRace>,
    pub opening_hipster: Option<OpeningHipster>,
    pub dadbod_shuffler: Option<DadbodShuffler>,
    pub sporty_queen: Option<SportyQueen>,
    pub edge_lord: Option<EdgeLord>,
    pub rook_lift: Option<RookLift>,
    pub center_stage: Option<CenterStage>,
    pub dark_lord: Option<DarkLord>,
    pub light_lord: Option<LightLord>,
    pub parkour_master: Option<ParkourMaster>,
}

pub fn calculate(games: &[RoundGame<'_>]) -> FunStats {
    let queen_trades = queen_trades::calculate(games);
    FunStats {
        fastest_queen_trade: queen_trades.fastest,
        slowest_queen_trade: queen_trades.slowest,
        longest_capture_sequence: capture_sequence::calculate(games),
        longest_check_sequence: check_sequence::calculate(games),
        pawn_storm: pawn_storm::calculate(games),
        piece_loyalty: piece_loyalty::calculate(games),
        square_tourist: square_tourist::calculate(games),
        castling_race: castling_race::calculate(games),
        opening_hipster: opening_hipster::calculate(games),
        dadbod_shuffler: dadbod_shuffler::calculate(games),
        sporty_queen: sporty_queen::calculate(games),
        edge_lord: edge_lord::calculate(games),
        rook_lift: rook_lift::calculate(games),
        center_stage: center_stage::calculate(games),
        dark_lord: dark_lord::calculate(games),
        light_lord: light_lord::calculate(games),
        parkour_master: parkour_master::calculate(games),
    }
}

/// The piece that starts the game on `id`, if any.
pub(crate) fn starting_piece(id: PieceId) -> Option<Piece> {
    Board::new().piece_at(id)
}

/// Role of the moving piece once the move is made, so promotions count as the new piece.
pub(crate) fn role_after(mv: &MoveRecord) -> Role {
    mv.flags.promotion.unwrap_or(mv.piece)
}

/// Winning side of a per-side count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SideBest {
    pub count: u32,
    pub color: Color,
    pub game: GameRef,
}

/// Per-game White/Black counters reduced to the single best side of the round.
/// White is offered before Black, so White wins a tie within a game.
#[derive(Debug)]
pub(crate) struct SideTally {
    white: u32,
    black: u32,
    best: Leader<u32, SideBest>,
}

impl Default for SideTally {
    fn default() -> Self {
        Self {
            white: 0,
            black: 0,
            best: Leader::highest(),
        }
    }
}

impl SideTally {
    pub fn reset(&mut self) {
        self.white = 0;
        self.black = 0;
    }

    pub fn bump(&mut self, color: Color) {
        match color {
            Color::White => self.white += 1,
            Color::Black => self.black += 1,
        }
    }

    pub fn finish_game(&mut self, game: &RoundGame<'_>) {
        for (color, count) in [(Color::White, self.white), (Color::Black, self.black)] {
            if count > 0 {
                self.best.offer(count, || SideBest {
                    count,
                    color,
                    game: GameRef::of(game),
                });
            }
        }
    }

    pub fn into_inner(self) -> Option<SideBest> {
        self.best.into_inner()
    }
}
