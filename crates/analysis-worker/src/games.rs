//! Turning stored PGN text into parsed games, dropping the ones that fail.

use std::path::PathBuf;

use chess_core::pgn::{parse_pgn, split_games};
use chess_core::ParsedGame;
use tracing::{debug, warn};

use crate::error::WorkerError;

#[derive(Debug, Default)]
pub struct LoadedGames {
    pub games: Vec<ParsedGame>,
    /// Inputs that could not be parsed.
    pub excluded: usize,
}

/// Parse every PGN, keeping input order among the valid ones.
pub fn load_games<I>(pgns: I) -> LoadedGames
where
    I: IntoIterator<Item = String>,
{
    let (tagged, excluded) = load_tagged(pgns.into_iter().map(|pgn| ((), pgn)));
    LoadedGames {
        games: tagged.into_iter().map(|((), game)| game).collect(),
        excluded,
    }
}

/// Like [`load_games`] for PGNs carrying a tag (e.g. their round number).
/// Returns the parsed games with their tags and the number excluded.
pub fn load_tagged<T, I>(pgns: I) -> (Vec<(T, ParsedGame)>, usize)
where
    I: IntoIterator<Item = (T, String)>,
{
    let mut games = Vec::new();
    let mut excluded = 0;
    for (index, (tag, pgn)) in pgns.into_iter().enumerate() {
        match parse_pgn(&pgn) {
            Ok(game) => games.push((tag, game)),
            Err(e) => {
                warn!(index, error = %e, "Skipping unparseable game");
                excluded += 1;
            }
        }
    }
    (games, excluded)
}

/// Leading round number of a `Round` tag such as `3` or `3.1`.
pub fn round_from_tag(tag: &str) -> Option<u32> {
    let tag = tag.trim();
    let digits = tag.find(|c: char| !c.is_ascii_digit()).unwrap_or(tag.len());
    tag[..digits].parse().ok()
}

/// Read every game from the PGN files matching `pattern` (a path or a glob).
pub async fn read_pgn_input(pattern: &str) -> Result<Vec<String>, WorkerError> {
    let paths: Vec<PathBuf> = glob::glob(pattern)
        .map_err(|e| WorkerError::Config(format!("Invalid input pattern {pattern}: {e}")))?
        .filter_map(Result::ok)
        .collect();
    if paths.is_empty() {
        return Err(WorkerError::Config(format!("No PGN files match {pattern}")));
    }

    let mut pgns = Vec::new();
    for path in paths {
        let text = tokio::fs::read_to_string(&path).await?;
        let games = split_games(&text);
        debug!(path = %path.display(), games = games.len(), "Read PGN file");
        pgns.extend(games);
    }
    Ok(pgns)
}
