//! Stats pipeline errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("no valid games to analyze ({excluded} excluded)")]
    NoValidGames { excluded: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
