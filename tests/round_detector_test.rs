use analysis_worker::round::{detect_round, RoundPolicy, RoundSnapshot, RoundStatus, SeasonSnapshot};
use analysis_worker::WorkerError;
use chrono::{Duration, Utc};

fn snapshot(rounds: Vec<RoundSnapshot>) -> SeasonSnapshot {
    SeasonSnapshot {
        season_number: 4,
        rounds,
    }
}

fn round(number: u32, days_ago: i64, verified_games: u32) -> RoundSnapshot {
    RoundSnapshot {
        id: format!("clround{number}"),
        round_number: number,
        round_date: Utc::now() - Duration::days(days_ago),
        verified_games,
    }
}

#[test]
fn finished_round_with_enough_games_is_complete() {
    let season = snapshot(vec![round(1, 20, 22)]);
    let detection = detect_round(&season, Utc::now(), &RoundPolicy::default()).unwrap();

    assert_eq!(detection.round_number, 1);
    assert_eq!(detection.season_number, 4);
    assert!(detection.is_complete);
    assert!(!detection.is_active);
    assert!(!detection.should_analyze);
    assert_eq!(detection.status, RoundStatus::Complete);

    let json = serde_json::to_value(&detection).unwrap();
    assert_eq!(json["status"], "complete");
    assert_eq!(json["shouldAnalyze"], false);
    assert_eq!(json["gameCount"], 22);
    assert_eq!(json["expectedGames"], 25);
}

#[test]
fn round_started_today_is_active() {
    let season = snapshot(vec![round(1, 20, 25), round(2, 0, 10)]);
    let detection = detect_round(&season, Utc::now(), &RoundPolicy::default()).unwrap();

    assert_eq!(detection.round_number, 2);
    assert_eq!(detection.round_id, "clround2");
    assert!(detection.is_active);
    assert!(!detection.is_complete);
    assert!(detection.should_analyze);
    assert_eq!(detection.status, RoundStatus::Active);

    let json = serde_json::to_value(&detection).unwrap();
    assert_eq!(json["status"], "active");
    assert_eq!(json["isActive"], true);
}

#[test]
fn overdue_round_short_of_games_is_incomplete() {
    let season = snapshot(vec![round(1, 30, 12), round(2, 16, 25)]);
    let detection = detect_round(&season, Utc::now(), &RoundPolicy::default()).unwrap();

    assert_eq!(detection.round_number, 1);
    assert_eq!(detection.status, RoundStatus::Incomplete);
    assert!(detection.should_analyze);
}

#[test]
fn season_without_rounds_is_an_error() {
    let err = detect_round(&snapshot(Vec::new()), Utc::now(), &RoundPolicy::default()).unwrap_err();
    assert!(matches!(err, WorkerError::NoRounds(4)));
}
