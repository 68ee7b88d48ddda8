mod common;

use common::*;
use round_stats::{HighlightConfig, SeasonGame, SeasonHighlights};

fn season_game(round: u32, white: &str, black: &str, result: &str, sans: &[&str]) -> SeasonGame {
    SeasonGame {
        round,
        game: game(white, black, result, sans),
        evaluation: None,
    }
}

fn season() -> Vec<SeasonGame> {
    vec![
        season_game(1, "Alice Smith", "Bob", "1-0", &ROOK_MATE_ON_20),
        season_game(2, "Carol", "Alice Smith", "1/2-1/2", &NO_CAPTURES),
        season_game(3, "Alice Smith", "Dave", "0-1", &TWELVE_CAPTURES),
    ]
}

#[test]
fn only_regular_players_get_a_card() {
    let games = season();
    let doc = SeasonHighlights::new(&games, 2).generated_at(fixed_time()).build();

    assert_eq!(doc.season, 2);
    assert_eq!(doc.total_games, 3);
    assert_eq!(doc.player_count, 1);

    let alice = &doc.players[0];
    assert_eq!(alice.name, "Alice Smith");
    assert_eq!(alice.slug, "alice-smith");
    assert_eq!(alice.card.games_played, 3);
    assert_eq!(alice.card.games_as_white, 2);
    assert_eq!(alice.card.games_as_black, 1);
    assert_eq!((alice.card.wins, alice.card.losses, alice.card.draws), (1, 1, 1));
    assert_eq!(alice.card.tactics.checkmates, 1);
    assert!(alice.card.accuracy.overall.is_none());
    assert!(alice.card.avg_centipawn_loss.is_none());

    let longest = alice.card.longest_game.as_ref().unwrap();
    assert_eq!(longest.opponent, "Bob");
    assert_eq!(longest.round, "1");
}

#[test]
fn min_games_is_configurable() {
    let games = season();
    let doc = SeasonHighlights::new(&games, 2)
        .config(HighlightConfig {
            min_games: 1,
            ..HighlightConfig::default()
        })
        .build();

    assert_eq!(doc.player_count, 4);
    let names: Vec<&str> = doc.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Alice Smith", "Bob", "Carol", "Dave"]);
    assert!(doc.players.iter().all(|p| p.highlights.len() <= 3));
}

#[test]
fn document_serializes_camel_case() {
    let games = season();
    let doc = SeasonHighlights::new(&games, 2).generated_at(fixed_time()).build();
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["season"], 2);
    assert_eq!(json["status"], "complete");
    assert_eq!(json["playerCount"], 1);
    assert_eq!(json["totalGames"], 3);
    assert_eq!(json["players"][0]["card"]["gamesPlayed"], 3);
    assert_eq!(json["generated"], "2025-03-18T12:00:00Z");
}
