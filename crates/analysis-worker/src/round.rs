//! Round detection: which round of a season the stats run should target.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::WorkerError;

/// League pacing used to decide whether a round is active or complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundPolicy {
    pub expected_games: u32,
    /// Fraction of `expected_games` that marks a round complete.
    pub completion_threshold: f64,
    pub round_length: Duration,
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self {
            expected_games: 25,
            completion_threshold: 0.8,
            round_length: Duration::days(14),
        }
    }
}

impl RoundPolicy {
    pub fn is_complete(&self, verified_games: u32) -> bool {
        f64::from(verified_games) >= f64::from(self.expected_games) * self.completion_threshold
    }

    pub fn is_active(&self, round_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now >= round_date && now < round_date + self.round_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub id: String,
    pub round_number: u32,
    pub round_date: DateTime<Utc>,
    pub verified_games: u32,
}

/// A season with its rounds in ascending round number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSnapshot {
    pub season_number: u32,
    pub rounds: Vec<RoundSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Active,
    Incomplete,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetection {
    pub round_id: String,
    pub round_number: u32,
    pub season_number: u32,
    pub game_count: u32,
    pub expected_games: u32,
    pub is_active: bool,
    pub is_complete: bool,
    pub should_analyze: bool,
    pub round_date: DateTime<Utc>,
    pub status: RoundStatus,
}

/// Pick the first round that is still running or short of games; when every
/// round is done, report the last one with `should_analyze = false`.
pub fn detect_round(
    season: &SeasonSnapshot,
    now: DateTime<Utc>,
    policy: &RoundPolicy,
) -> Result<RoundDetection, WorkerError> {
    let detection = |round: &RoundSnapshot, is_active: bool, is_complete: bool, status: RoundStatus| {
        RoundDetection {
            round_id: round.id.clone(),
            round_number: round.round_number,
            season_number: season.season_number,
            game_count: round.verified_games,
            expected_games: policy.expected_games,
            is_active,
            is_complete,
            should_analyze: status != RoundStatus::Complete,
            round_date: round.round_date,
            status,
        }
    };

    for round in &season.rounds {
        let is_active = policy.is_active(round.round_date, now);
        let is_complete = policy.is_complete(round.verified_games);
        if is_active || !is_complete {
            let status = if is_active {
                RoundStatus::Active
            } else {
                RoundStatus::Incomplete
            };
            return Ok(detection(round, is_active, is_complete, status));
        }
    }

    season
        .rounds
        .last()
        .map(|round| detection(round, false, true, RoundStatus::Complete))
        .ok_or(WorkerError::NoRounds(season.season_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap()
    }

    fn round(number: u32, day: u32, verified_games: u32) -> RoundSnapshot {
        RoundSnapshot {
            id: format!("round-{number}"),
            round_number: number,
            round_date: date(day),
            verified_games,
        }
    }

    #[test]
    fn test_active_round_is_selected() {
        let season = SeasonSnapshot {
            season_number: 2,
            rounds: vec![round(1, 1, 20), round(2, 15, 12)],
        };
        let detected = detect_round(&season, date(16), &RoundPolicy::default()).unwrap();

        assert_eq!(detected.round_number, 2);
        assert_eq!(detected.status, RoundStatus::Active);
        assert!(detected.is_active);
        assert!(!detected.is_complete);
        assert!(detected.should_analyze);
        assert_eq!(detected.game_count, 12);
        assert_eq!(detected.expected_games, 25);
    }

    #[test]
    fn test_all_complete_returns_last_round() {
        let season = SeasonSnapshot {
            season_number: 2,
            rounds: vec![round(1, 1, 20), round(2, 15, 25)],
        };
        let now = Utc.with_ymd_and_hms(2025, 4, 30, 0, 0, 0).unwrap();
        let detected = detect_round(&season, now, &RoundPolicy::default()).unwrap();

        assert_eq!(detected.round_number, 2);
        assert_eq!(detected.status, RoundStatus::Complete);
        assert!(!detected.should_analyze);
        assert!(detected.is_complete);
    }

    #[test]
    fn test_past_incomplete_round_wins_over_later_ones() {
        let season = SeasonSnapshot {
            season_number: 1,
            rounds: vec![round(1, 1, 19), round(2, 15, 25)],
        };
        let now = Utc.with_ymd_and_hms(2025, 4, 30, 0, 0, 0).unwrap();
        let detected = detect_round(&season, now, &RoundPolicy::default()).unwrap();

        assert_eq!(detected.round_number, 1);
        assert_eq!(detected.status, RoundStatus::Incomplete);
        assert!(detected.should_analyze);
    }

    #[test]
    fn test_round_window_end_is_exclusive() {
        let policy = RoundPolicy::default();
        assert!(policy.is_active(date(1), date(1)));
        assert!(policy.is_active(date(1), date(14)));
        assert!(!policy.is_active(date(1), date(15)));
        assert!(!policy.is_active(date(2), date(1)));
    }

    #[test]
    fn test_completion_threshold() {
        let policy = RoundPolicy::default();
        assert!(!policy.is_complete(19));
        assert!(policy.is_complete(20));
    }

    #[test]
    fn test_season_without_rounds_is_an_error() {
        let season = SeasonSnapshot {
            season_number: 4,
            rounds: Vec::new(),
        };
        let err = detect_round(&season, date(1), &RoundPolicy::default()).unwrap_err();
        assert!(matches!(err, WorkerError::NoRounds(4)));
    }

    #[test]
    fn test_detection_json_shape() {
        let season = SeasonSnapshot {
            season_number: 2,
            rounds: vec![round(1, 1, 3)],
        };
        let detected = detect_round(&season, date(2), &RoundPolicy::default()).unwrap();
        let json = serde_json::to_value(&detected).unwrap();

        assert_eq!(json["roundId"], "round-1");
        assert_eq!(json["seasonNumber"], 2);
        assert_eq!(json["shouldAnalyze"], true);
        assert_eq!(json["status"], "active");
        assert_eq!(json["roundDate"], "2025-03-01T00:00:00Z");
    }
}
