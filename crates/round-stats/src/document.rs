//! Round statistics document: every calculator over one round's games.

use chess_core::{ParsedGame, PhaseConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analysis::{self, AnalysisSection, GameEvaluation};
use crate::calculators::{
    awards, checkmates, game_phases, heatmap, openings, overview, pieces, results, tactics,
};
use crate::error::StatsError;
use crate::fun_stats::{self, FunStats};
use crate::scanner::prepare;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDocument {
    pub round_number: u32,
    pub season_number: u32,
    pub generated_at: DateTime<Utc>,
    /// Games dropped before analysis (unparseable or empty).
    pub excluded_games: usize,
    pub overview: overview::Overview,
    pub game_phases: game_phases::GamePhaseStats,
    pub results: results::Results,
    pub openings: openings::OpeningStats,
    pub tactics: tactics::Tactics,
    pub pieces: pieces::PieceStats,
    pub checkmates: checkmates::Checkmates,
    pub board_heatmap: heatmap::BoardHeatmap,
    pub awards: awards::Awards,
    pub fun_stats: FunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSection>,
}

impl StatsDocument {
    pub fn to_json_pretty(&self) -> Result<String, StatsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for a round's [`StatsDocument`].
pub struct RoundStats<'a> {
    games: &'a [ParsedGame],
    round_number: u32,
    season_number: u32,
    excluded_games: usize,
    evaluations: &'a [GameEvaluation],
    phase_config: PhaseConfig,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> RoundStats<'a> {
    pub fn new(games: &'a [ParsedGame], round_number: u32, season_number: u32) -> Self {
        Self {
            games,
            round_number,
            season_number,
            excluded_games: 0,
            evaluations: &[],
            phase_config: PhaseConfig::default(),
            generated_at: None,
        }
    }

    pub fn excluded_games(mut self, excluded: usize) -> Self {
        self.excluded_games = excluded;
        self
    }

    /// Engine traces indexed like `games`. Without any, `analysis` is omitted.
    pub fn evaluations(mut self, evaluations: &'a [GameEvaluation]) -> Self {
        self.evaluations = evaluations;
        self
    }

    pub fn phase_config(mut self, config: PhaseConfig) -> Self {
        self.phase_config = config;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn build(self) -> Result<StatsDocument, StatsError> {
        if self.games.is_empty() {
            return Err(StatsError::NoValidGames {
                excluded: self.excluded_games,
            });
        }

        let games = prepare(self.games, &self.phase_config);
        let analysis = analysis::analyze(&games, self.evaluations);
        debug!(
            round = self.round_number,
            games = games.len(),
            analysed = analysis.as_ref().map_or(0, |a| a.summary.games_analyzed),
            "computed round statistics"
        );

        Ok(StatsDocument {
            round_number: self.round_number,
            season_number: self.season_number,
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            excluded_games: self.excluded_games,
            overview: overview::calculate(&games),
            game_phases: game_phases::calculate(&games),
            results: results::calculate(&games),
            openings: openings::calculate(&games),
            tactics: tactics::calculate(&games),
            pieces: pieces::calculate(&games),
            checkmates: checkmates::calculate(&games),
            board_heatmap: heatmap::calculate(&games),
            awards: awards::calculate(&games),
            fun_stats: fun_stats::calculate(&games),
            analysis,
        })
    }
}

/// Statistics for a round without engine data.
pub fn build_round_stats(
    games: &[ParsedGame],
    round_number: u32,
    season_number: u32,
) -> Result<StatsDocument, StatsError> {
    RoundStats::new(games, round_number, season_number).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::game;

    #[test]
    fn test_empty_round_is_an_error() {
        let err = RoundStats::new(&[], 1, 2).excluded_games(3).build().unwrap_err();
        assert!(matches!(err, StatsError::NoValidGames { excluded: 3 }));
    }

    #[test]
    fn test_document_shape() {
        let games = vec![game("Ann", "Bob", "0-1", &["f3", "e5", "g4", "Qh4#"])];
        let doc = build_round_stats(&games, 4, 2).unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        for key in [
            "roundNumber", "seasonNumber", "generatedAt", "overview", "gamePhases", "results",
            "openings", "tactics", "pieces", "checkmates", "boardHeatmap", "awards", "funStats",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("analysis").is_none());
        assert_eq!(json["roundNumber"], 4);
        assert_eq!(json["results"]["blackWins"], 1);
    }
}
