//! Engine-evaluation aggregation: centipawn loss, accuracy and move quality
//! per side, plus round-wide awards.
//!
//! Evaluations are always from the perspective of the side that moved, so a
//! move's loss is simply `eval_before - eval_after`, floored at zero.

use std::collections::BTreeMap;

use chess_core::moves::{color_key, full_move};
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use tracing::warn;

use crate::records::{round1, GameRef, Leader};
use crate::scanner::RoundGame;

/// Upper bounds (exclusive) of each move-quality bucket, in centipawns.
/// Only a move that loses nothing is excellent.
pub const GOOD_BELOW: i32 = 20;
pub const INACCURACY_BELOW: i32 = 50;
pub const MISTAKE_BELOW: i32 = 100;

/// Centipawn stand-in for a forced mate, signed towards the mating side.
pub const MATE_SCORE: i32 = 10_000;

/// One analysed ply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlyEvaluation {
    pub ply: usize,
    /// Best achievable score before the move, mover's perspective.
    pub eval_before: i32,
    /// Score after the move, mover's perspective.
    pub eval_after: i32,
    #[serde(default)]
    pub best_move: Option<String>,
}

impl PlyEvaluation {
    pub fn cp_loss(&self) -> i32 {
        (self.eval_before - self.eval_after).max(0)
    }
}

/// Engine trace for one game, indexed like the round's game list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvaluation {
    pub game_index: usize,
    pub plies: Vec<PlyEvaluation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveQuality {
    pub blunders: u32,
    pub mistakes: u32,
    pub inaccuracies: u32,
    pub good: u32,
    pub excellent: u32,
}

impl MoveQuality {
    pub fn record(&mut self, cp_loss: i32) {
        let bucket = match cp_loss {
            l if l <= 0 => &mut self.excellent,
            l if l < GOOD_BELOW => &mut self.good,
            l if l < INACCURACY_BELOW => &mut self.inaccuracies,
            l if l < MISTAKE_BELOW => &mut self.mistakes,
            _ => &mut self.blunders,
        };
        *bucket += 1;
    }

    pub fn add(&mut self, other: &MoveQuality) {
        self.blunders += other.blunders;
        self.mistakes += other.mistakes;
        self.inaccuracies += other.inaccuracies;
        self.good += other.good;
        self.excellent += other.excellent;
    }

    pub fn total(&self) -> u32 {
        self.blunders + self.mistakes + self.inaccuracies + self.good + self.excellent
    }
}

/// `100 - acpl / 10`, clamped to `[0, 100]`.
pub fn accuracy(acpl: f64) -> f64 {
    (100.0 - acpl / 10.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blunder {
    pub move_number: u32,
    pub ply: usize,
    /// `"white"` or `"black"`.
    pub player: &'static str,
    pub cp_loss: i32,
    #[serde(rename = "move")]
    pub san: String,
    pub eval_before: i32,
    pub eval_after: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    #[serde(rename = "gameIndex")]
    pub game_index: usize,
    pub white: String,
    pub black: String,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    #[serde(rename = "whiteAccuracy")]
    pub white_accuracy: f64,
    #[serde(rename = "blackAccuracy")]
    pub black_accuracy: f64,
    #[serde(rename = "whiteMoveQuality")]
    pub white_move_quality: MoveQuality,
    #[serde(rename = "blackMoveQuality")]
    pub black_move_quality: MoveQuality,
    #[serde(rename = "biggestBlunder")]
    pub biggest_blunder: Option<Blunder>,
    #[serde(rename = "whiteMovesAnalyzed")]
    pub white_moves_analyzed: usize,
    #[serde(rename = "blackMovesAnalyzed")]
    pub black_moves_analyzed: usize,
}

impl GameAnalysis {
    fn side(&self, color: Color) -> (f64, f64, usize) {
        match color {
            Color::White => (self.white_acpl, self.white_accuracy, self.white_moves_analyzed),
            Color::Black => (self.black_acpl, self.black_accuracy, self.black_moves_analyzed),
        }
    }

    fn game_ref(&self) -> GameRef {
        GameRef {
            game_index: self.game_index,
            white: self.white.clone(),
            black: self.black.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideRecord {
    pub player: &'static str,
    pub accuracy: f64,
    pub acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRecord {
    #[serde(rename = "combinedACPL")]
    pub combined_acpl: f64,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundBlunder {
    #[serde(flatten)]
    pub blunder: Blunder,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    #[serde(rename = "accuracyKing")]
    pub accuracy_king: Option<SideRecord>,
    #[serde(rename = "biggestBlunder")]
    pub biggest_blunder: Option<RoundBlunder>,
    #[serde(rename = "lowestACPL")]
    pub lowest_acpl: Option<SideRecord>,
    #[serde(rename = "highestACPL")]
    pub highest_acpl: Option<SideRecord>,
    #[serde(rename = "lowestCombinedACPL")]
    pub lowest_combined_acpl: Option<CombinedRecord>,
    #[serde(rename = "highestCombinedACPL")]
    pub highest_combined_acpl: Option<CombinedRecord>,
    #[serde(rename = "gamesAnalyzed")]
    pub games_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSection {
    pub games: Vec<GameAnalysis>,
    pub summary: AnalysisSummary,
}

#[derive(Default)]
struct SideLoss {
    total: i64,
    count: usize,
    quality: MoveQuality,
}

impl SideLoss {
    fn acpl(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            round1(self.total as f64 / self.count as f64)
        }
    }
}

/// Aggregate one game's trace. Plies outside the game are ignored.
pub fn analyze_game(game: &RoundGame<'_>, evaluation: &GameEvaluation) -> GameAnalysis {
    let moves = game.moves();
    let mut white = SideLoss::default();
    let mut black = SideLoss::default();
    let mut biggest = Leader::highest();

    for eval in &evaluation.plies {
        let Some(mv) = moves.get(eval.ply) else {
            warn!(game_index = game.index, ply = eval.ply, "evaluated ply beyond end of game");
            continue;
        };
        let loss = eval.cp_loss();
        let side = match mv.color {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        side.total += i64::from(loss);
        side.count += 1;
        side.quality.record(loss);

        if loss >= MISTAKE_BELOW {
            biggest.offer(loss, || Blunder {
                move_number: full_move(eval.ply),
                ply: eval.ply,
                player: color_key(mv.color),
                cp_loss: loss,
                san: mv.san.clone(),
                eval_before: eval.eval_before,
                eval_after: eval.eval_after,
            });
        }
    }

    let (white_acpl, black_acpl) = (white.acpl(), black.acpl());
    GameAnalysis {
        game_index: game.index,
        white: game.game.white_name().to_string(),
        black: game.game.black_name().to_string(),
        white_acpl,
        black_acpl,
        white_accuracy: accuracy(white_acpl),
        black_accuracy: accuracy(black_acpl),
        white_move_quality: white.quality,
        black_move_quality: black.quality,
        biggest_blunder: biggest.into_inner(),
        white_moves_analyzed: white.count,
        black_moves_analyzed: black.count,
    }
}

/// Aggregate every evaluated game of the round. Returns `None` when no game
/// has a usable trace.
pub fn analyze(games: &[RoundGame<'_>], evaluations: &[GameEvaluation]) -> Option<AnalysisSection> {
    let mut by_index: BTreeMap<usize, &GameEvaluation> = BTreeMap::new();
    for evaluation in evaluations {
        if evaluation.game_index >= games.len() {
            warn!(game_index = evaluation.game_index, "evaluation for unknown game, skipping");
            continue;
        }
        if evaluation.plies.is_empty() {
            continue;
        }
        if by_index.insert(evaluation.game_index, evaluation).is_some() {
            warn!(game_index = evaluation.game_index, "duplicate evaluation, keeping the last one");
        }
    }

    let analyses: Vec<GameAnalysis> = by_index
        .into_iter()
        .map(|(index, evaluation)| analyze_game(&games[index], evaluation))
        .filter(|a| a.white_moves_analyzed + a.black_moves_analyzed > 0)
        .collect();

    if analyses.is_empty() {
        return None;
    }

    Some(AnalysisSection {
        summary: summarize(&analyses),
        games: analyses,
    })
}

fn summarize(analyses: &[GameAnalysis]) -> AnalysisSummary {
    let mut accuracy_king = Leader::highest();
    let mut lowest_acpl = Leader::lowest();
    let mut highest_acpl = Leader::highest();
    let mut biggest_blunder = Leader::highest();
    let mut lowest_combined = Leader::lowest();
    let mut highest_combined = Leader::highest();

    for analysis in analyses {
        for color in [Color::White, Color::Black] {
            let (acpl, accuracy, analysed) = analysis.side(color);
            if analysed == 0 {
                continue;
            }
            let record = || SideRecord {
                player: color_key(color),
                accuracy,
                acpl,
                game: analysis.game_ref(),
            };
            accuracy_king.offer(accuracy, record);
            lowest_acpl.offer(acpl, record);
            highest_acpl.offer(acpl, record);
        }

        if let Some(blunder) = &analysis.biggest_blunder {
            biggest_blunder.offer(blunder.cp_loss, || RoundBlunder {
                blunder: blunder.clone(),
                game: analysis.game_ref(),
            });
        }

        if analysis.white_moves_analyzed > 0 && analysis.black_moves_analyzed > 0 {
            let combined = round1((analysis.white_acpl + analysis.black_acpl) / 2.0);
            let record = || CombinedRecord {
                combined_acpl: combined,
                white_acpl: analysis.white_acpl,
                black_acpl: analysis.black_acpl,
                game: analysis.game_ref(),
            };
            lowest_combined.offer(combined, record);
            highest_combined.offer(combined, record);
        }
    }

    AnalysisSummary {
        accuracy_king: accuracy_king.into_inner(),
        biggest_blunder: biggest_blunder.into_inner(),
        lowest_acpl: lowest_acpl.into_inner(),
        highest_acpl: highest_acpl.into_inner(),
        lowest_combined_acpl: lowest_combined.into_inner(),
        highest_combined_acpl: highest_combined.into_inner(),
        games_analyzed: analyses.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    fn ply(ply: usize, before: i32, after: i32) -> PlyEvaluation {
        PlyEvaluation {
            ply,
            eval_before: before,
            eval_after: after,
            best_move: None,
        }
    }

    #[test]
    fn test_quality_buckets_are_contiguous() {
        let mut quality = MoveQuality::default();
        for loss in [0, 1, 19, 20, 49, 50, 99, 100, 5000] {
            quality.record(loss);
        }
        assert_eq!(
            quality,
            MoveQuality {
                blunders: 2,
                mistakes: 2,
                inaccuracies: 2,
                good: 2,
                excellent: 1,
            }
        );
    }

    #[test]
    fn test_small_loss_is_good_not_excellent() {
        let mut quality = MoveQuality::default();
        quality.record(5);
        assert_eq!((quality.good, quality.excellent), (1, 0));

        quality.record(0);
        assert_eq!(quality.excellent, 1);
    }

    #[test]
    fn test_accuracy_is_clamped() {
        assert_eq!(accuracy(0.0), 100.0);
        assert_eq!(accuracy(250.0), 75.0);
        assert_eq!(accuracy(1500.0), 0.0);
    }

    #[test]
    fn test_improving_moves_cost_nothing() {
        assert_eq!(ply(0, 30, 80).cp_loss(), 0);
        assert_eq!(ply(0, 30, -20).cp_loss(), 50);
    }

    #[test]
    fn test_game_analysis() {
        let games = vec![game("Ann", "Bob", "1-0", &["e4", "e5", "Nf3", "f6", "Nxe5"])];
        let round = round(&games);
        let evaluation = GameEvaluation {
            game_index: 0,
            plies: vec![ply(0, 30, 25), ply(1, -25, -40), ply(2, 40, 35), ply(3, -35, -180), ply(4, 180, 170)],
        };
        let analysis = analyze_game(&round[0], &evaluation);

        assert_eq!(analysis.white_moves_analyzed, 3);
        assert_eq!(analysis.white_acpl, round1(20.0 / 3.0));
        assert_eq!(analysis.black_acpl, 80.0);
        assert_eq!(analysis.black_accuracy, 92.0);
        assert_eq!(analysis.black_move_quality.blunders, 1);
        assert_eq!(analysis.black_move_quality.inaccuracies, 0);
        assert_eq!(analysis.black_move_quality.good, 1);
        assert_eq!(analysis.white_move_quality.good, 3);
        assert_eq!(analysis.white_move_quality.excellent, 0);

        let blunder = analysis.biggest_blunder.unwrap();
        assert_eq!(blunder.san, "f6");
        assert_eq!(blunder.move_number, 2);
        assert_eq!(blunder.cp_loss, 145);
        assert_eq!(blunder.player, "black");
    }

    #[test]
    fn test_unknown_indices_are_skipped() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "e5"])];
        let round = round(&games);
        let evaluations = vec![GameEvaluation {
            game_index: 7,
            plies: vec![ply(0, 0, 0)],
        }];
        assert!(analyze(&round, &evaluations).is_none());
    }

    #[test]
    fn test_summary_awards() {
        let games = vec![
            game("Ann", "Bob", "*", &["e4", "e5"]),
            game("Cat", "Dan", "*", &["d4", "d5"]),
        ];
        let round = round(&games);
        let evaluations = vec![
            GameEvaluation {
                game_index: 1,
                plies: vec![ply(0, 20, 20), ply(1, 0, -300)],
            },
            GameEvaluation {
                game_index: 0,
                plies: vec![ply(0, 20, 10), ply(1, 0, -40)],
            },
        ];
        let section = analyze(&round, &evaluations).unwrap();
        let summary = &section.summary;

        assert_eq!(section.games[0].game_index, 0);
        assert_eq!(summary.games_analyzed, 2);

        let king = summary.accuracy_king.as_ref().unwrap();
        assert_eq!((king.player, king.game.game_index), ("white", 1));
        assert_eq!(king.accuracy, 100.0);

        let roughest = summary.highest_acpl.as_ref().unwrap();
        assert_eq!((roughest.acpl, roughest.player), (300.0, "black"));

        let cleanest = summary.lowest_combined_acpl.as_ref().unwrap();
        assert_eq!(cleanest.combined_acpl, 25.0);
        assert_eq!(cleanest.game.game_index, 0);

        let blunder = summary.biggest_blunder.as_ref().unwrap();
        assert_eq!(blunder.blunder.cp_loss, 300);
        assert_eq!(blunder.game.white, "Cat");

        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["lowestCombinedACPL"]["combinedACPL"], 25.0);
        assert_eq!(json["biggestBlunder"]["move"], "d5");
    }
}
