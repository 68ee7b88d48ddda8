//! PGN loading errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("empty PGN text")]
    Empty,

    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("non-standard starting position")]
    UnsupportedSetup,

    #[error("illegal or unreadable move {san:?} at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    #[error("game has no moves")]
    NoMoves,
}
