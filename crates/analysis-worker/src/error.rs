//! Worker error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stockfish error: {0}")]
    Stockfish(String),

    #[error("Season {0} not found")]
    SeasonNotFound(u32),

    #[error("No active season found")]
    NoActiveSeason,

    #[error("No rounds found for season {0}")]
    NoRounds(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stats error: {0}")]
    Stats(#[from] round_stats::StatsError),
}
