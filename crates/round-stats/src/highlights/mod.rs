//! Season-long per-player highlights: a career card plus the few most
//! notable moments from every player with enough games.

mod card;
mod detect;

use std::collections::BTreeMap;

use chess_core::{OpeningBook, ParsedGame};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shakmaty::Color;
use tracing::debug;

use crate::analysis::GameEvaluation;

pub use card::{
    build_card, CardAccuracy, CardTactics, FavoriteOpening, FavoriteOpenings, GameSummary,
    PlayerCard,
};
pub use detect::{format_eval, Highlight, HighlightKind};

/// One game of the season with the round it was played in.
#[derive(Debug, Clone)]
pub struct SeasonGame {
    pub round: u32,
    pub game: ParsedGame,
    pub evaluation: Option<GameEvaluation>,
}

/// Thresholds for the engine-based highlight triggers, in centipawns from
/// the mover's point of view unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightConfig {
    pub min_games: usize,
    pub max_highlights: usize,
    /// A move losing at least this much is a blunder.
    pub blunder_loss: i32,
    /// Brilliant move: near-best move that lifts the mover's score this much
    /// over their previous evaluated move.
    pub brilliant_max_loss: i32,
    pub brilliant_swing: i32,
    /// Sacrifice: material points (pawn = 1) given up after the reply.
    pub sacrifice_min_material: i32,
    pub sacrifice_max_loss: i32,
    /// Comeback: the eventual winner dropped to `comeback_low` and later
    /// climbed back to `comeback_recovery`.
    pub comeback_low: i32,
    pub comeback_recovery: i32,
    /// Material points the move after a check must capture.
    pub tactical_capture_value: i32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            min_games: 3,
            max_highlights: 3,
            blunder_loss: 300,
            brilliant_max_loss: 5,
            brilliant_swing: 200,
            sacrifice_min_material: 2,
            sacrifice_max_loss: 30,
            comeback_low: -300,
            comeback_recovery: 100,
            tactical_capture_value: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHighlights {
    pub name: String,
    pub slug: String,
    pub card: PlayerCard,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsDocument {
    pub generated: DateTime<Utc>,
    pub season: u32,
    pub status: &'static str,
    pub player_count: usize,
    pub total_games: usize,
    pub players: Vec<PlayerHighlights>,
}

/// URL-safe player key: lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Builder for the season highlights document.
pub struct SeasonHighlights<'a> {
    games: &'a [SeasonGame],
    season: u32,
    config: HighlightConfig,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> SeasonHighlights<'a> {
    pub fn new(games: &'a [SeasonGame], season: u32) -> Self {
        Self {
            games,
            season,
            config: HighlightConfig::default(),
            generated_at: None,
        }
    }

    pub fn config(mut self, config: HighlightConfig) -> Self {
        self.config = config;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn build(self) -> HighlightsDocument {
        let book = OpeningBook::standard();

        let mut by_player: BTreeMap<&str, Vec<(&SeasonGame, Color)>> = BTreeMap::new();
        for season_game in self.games {
            for color in [Color::White, Color::Black] {
                by_player
                    .entry(season_game.game.player(color))
                    .or_default()
                    .push((season_game, color));
            }
        }

        let total_players = by_player.len();
        let players: Vec<PlayerHighlights> = by_player
            .into_iter()
            .filter(|(_, games)| games.len() >= self.config.min_games)
            .map(|(name, games)| PlayerHighlights {
                name: name.to_string(),
                slug: slugify(name),
                card: build_card(&games, book),
                highlights: self.select(&games),
            })
            .collect();

        debug!(
            season = self.season,
            players = players.len(),
            excluded = total_players - players.len(),
            "built season highlights"
        );

        HighlightsDocument {
            generated: self.generated_at.unwrap_or_else(Utc::now),
            season: self.season,
            status: "complete",
            player_count: players.len(),
            total_games: self.games.len(),
            players,
        }
    }

    /// Best moments across a player's games: priority first, then score.
    fn select(&self, games: &[(&SeasonGame, Color)]) -> Vec<Highlight> {
        let mut highlights: Vec<Highlight> = games
            .iter()
            .flat_map(|&(game, color)| detect::detect(game, color, &self.config))
            .collect();
        highlights.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.score.cmp(&a.score)));
        highlights.truncate(self.config.max_highlights);
        highlights
    }
}

pub fn build_season_highlights(games: &[SeasonGame], season: u32) -> HighlightsDocument {
    SeasonHighlights::new(games, season).build()
}
