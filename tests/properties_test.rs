//! Invariants every round document must satisfy.

mod common;

use chess_core::moves::{full_move, ply_color};
use chess_core::{classify, segment, segment_game, PhaseConfig};
use common::*;
use round_stats::analysis::accuracy;
use round_stats::{GameEvaluation, PlyEvaluation, RoundStats};
use shakmaty::Color;

#[test]
fn same_input_same_document() {
    let games = sample_round();
    let first = RoundStats::new(&games, 3, 2).generated_at(fixed_time()).build().unwrap();
    let second = RoundStats::new(&games, 3, 2).generated_at(fixed_time()).build().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn heatmap_counts_every_ply_and_capture() {
    let games = sample_round();
    let doc = RoundStats::new(&games, 3, 2).build().unwrap();

    let plies: usize = games.iter().map(|g| g.moves.len()).sum();
    let visits: u32 = doc.board_heatmap.visits.values().sum();
    let captures: u32 = doc.board_heatmap.captures.values().sum();

    assert_eq!(doc.board_heatmap.visits.len(), 64);
    assert_eq!(doc.board_heatmap.captures.len(), 64);
    assert_eq!(visits as usize, plies);
    assert_eq!(doc.overview.total_plies, plies);
    assert_eq!(captures as usize, doc.tactics.total_captures);
}

#[test]
fn accuracy_stays_in_bounds() {
    for acpl in [0.0, 12.5, 250.0, 999.0, 1000.0, 5000.0] {
        let value = accuracy(acpl);
        assert!((0.0..=100.0).contains(&value), "accuracy({acpl}) = {value}");
    }
    assert_eq!(accuracy(0.0), 100.0);
    assert_eq!(accuracy(5000.0), 0.0);
}

#[test]
fn analysed_sides_have_bounded_accuracy() {
    let games = vec![game("Ann", "Bob", "1/2-1/2", &NO_CAPTURES)];
    let evaluation = GameEvaluation {
        game_index: 0,
        plies: (0..NO_CAPTURES.len())
            .map(|ply| PlyEvaluation {
                ply,
                eval_before: 40,
                eval_after: if ply == 3 { -4000 } else { 35 },
                best_move: None,
            })
            .collect(),
    };
    let evaluations = [evaluation];
    let doc = RoundStats::new(&games, 1, 1).evaluations(&evaluations).build().unwrap();

    let analysis = doc.analysis.unwrap();
    let game = &analysis.games[0];
    for value in [game.white_accuracy, game.black_accuracy] {
        assert!((0.0..=100.0).contains(&value));
    }
    assert_eq!(game.black_move_quality.blunders, 1);
    assert_eq!(game.white_moves_analyzed + game.black_moves_analyzed, NO_CAPTURES.len());
    let blunder = game.biggest_blunder.as_ref().unwrap();
    assert_eq!(blunder.san, "Nc6");
    assert_eq!(blunder.move_number, 2);
    assert_eq!(analysis.summary.games_analyzed, 1);
}

#[test]
fn ties_go_to_the_earlier_game() {
    let games = vec![
        game("First", "One", "1/2-1/2", &NO_CAPTURES),
        game("Second", "Two", "1/2-1/2", &NO_CAPTURES),
    ];
    let doc = RoundStats::new(&games, 1, 1).build().unwrap();

    let pacifist = doc.awards.pacifist.unwrap();
    assert_eq!(pacifist.game.game_index, 0);
    assert_eq!(pacifist.game.white, "First");
    assert_eq!(doc.tactics.quietest_game.unwrap().game.game_index, 0);
    assert_eq!(doc.overview.longest_game.unwrap().game.game_index, 0);
}

#[test]
fn phase_boundaries_are_ordered() {
    for sans in [
        &ROOK_MATE_ON_20[..],
        &EN_PASSANT_ON_PLY_14[..],
        &TWELVE_CAPTURES[..],
        &NO_CAPTURES[..],
        &["e4"][..],
    ] {
        let parsed = game("W", "B", "*", sans);
        let phases = segment_game(&parsed);
        assert!(phases.opening_end <= phases.middlegame_end);
        assert!(phases.middlegame_end <= phases.total_plies);
        assert_eq!(phases.total_plies, sans.len());
        assert_eq!(
            phases.opening_plies() + phases.middlegame_plies() + phases.endgame_plies(),
            sans.len()
        );
        assert_eq!(phases, segment(&parsed.moves, &PhaseConfig::default()));
    }
}

#[test]
fn trade_heavy_game_reaches_the_endgame_early() {
    let parsed = game("W", "B", "0-1", &TWELVE_CAPTURES);
    let phases = segment_game(&parsed);
    assert!(phases.opening_end < phases.total_plies);
    assert!(phases.middlegame_end <= phases.total_plies);
}

#[test]
fn classifier_is_idempotent() {
    let sequence = "e4 e5 Nf3 Nc6 Bc4 Bc5 O-O Nf6";
    let first = classify(sequence).unwrap();
    let second = classify(sequence).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.eco, "C50");
    assert_eq!(first.name, "Italian Game: Giuoco Piano");
    assert_eq!(first.matched_plies, 6);

    assert_eq!(classify("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5"), Some(first));
    assert_eq!(classify("Ke2 Ke7"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn ply_numbering() {
    assert_eq!(full_move(0), 1);
    assert_eq!(full_move(1), 1);
    assert_eq!(full_move(38), 20);
    assert_eq!(ply_color(0), Color::White);
    assert_eq!(ply_color(13), Color::Black);
    assert_eq!(ply_color(38), Color::White);
}
