use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role, Square};

/// Tag pairs the stats pipeline reads. Missing names stay `None` so callers
/// can decide on their own fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub round: Option<String>,
    pub event: Option<String>,
    pub site: Option<String>,
    pub eco: Option<String>,
    pub game_url: Option<String>,
    pub white_elo: Option<u32>,
    pub black_elo: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub kingside_castle: bool,
    pub queenside_castle: bool,
    pub en_passant: bool,
    pub promotion: Option<Role>,
    pub check: bool,
    pub checkmate: bool,
}

impl MoveFlags {
    pub fn is_castle(&self) -> bool {
        self.kingside_castle || self.queenside_castle
    }
}

/// One ply of a replayed game.
///
/// For castling `from`/`to` are the king's squares (e1 -> g1), matching what
/// a human reads off the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub piece: Role,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Role>,
    pub san: String,
    pub uci: String,
    pub fen_before: String,
    pub flags: MoveFlags,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGame {
    pub headers: GameHeaders,
    pub moves: Vec<MoveRecord>,
    pub pgn: String,
}

impl ParsedGame {
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn result(&self) -> GameResult {
        GameResult::from_tag(&self.headers.result)
    }

    pub fn white_name(&self) -> &str {
        self.headers.white.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown")
    }

    pub fn black_name(&self) -> &str {
        self.headers.black.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown")
    }

    pub fn player(&self, color: Color) -> &str {
        match color {
            Color::White => self.white_name(),
            Color::Black => self.black_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unfinished,
}

impl GameResult {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "1-0" => GameResult::WhiteWins,
            "0-1" => GameResult::BlackWins,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unfinished,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_decisive(self) -> bool {
        self.winner().is_some()
    }
}
