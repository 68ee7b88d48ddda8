use std::collections::BTreeMap;

use chess_core::{GameResult, OpeningBook};
use serde::Serialize;

use crate::records::{percentage, Tally};
use crate::scanner::RoundGame;

/// Plies that make up a "popular sequence" (three moves each).
const SEQUENCE_PLIES: usize = 6;
const TOP_SEQUENCES: usize = 10;
const TOP_NAMED: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstMoveStats {
    pub count: usize,
    pub percentage: f64,
    /// White's win rate after this first move.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceCount {
    pub moves: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedOpeningCount {
    pub eco: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningStats {
    pub first_moves: BTreeMap<String, FirstMoveStats>,
    pub popular_sequences: Vec<SequenceCount>,
    pub classified: Vec<NamedOpeningCount>,
}

pub fn calculate(games: &[RoundGame<'_>]) -> OpeningStats {
    calculate_with_book(games, OpeningBook::standard())
}

pub fn calculate_with_book(games: &[RoundGame<'_>], book: &OpeningBook) -> OpeningStats {
    let mut first: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut sequences = Tally::new();
    let mut named = Tally::new();

    for game in games {
        let moves = game.moves();
        let Some(first_move) = moves.first() else {
            continue;
        };

        let entry = first.entry(first_move.san.clone()).or_insert((0, 0));
        entry.0 += 1;
        if game.game.result() == GameResult::WhiteWins {
            entry.1 += 1;
        }

        if moves.len() >= SEQUENCE_PLIES {
            let sequence: Vec<&str> = moves[..SEQUENCE_PLIES].iter().map(|m| m.san.as_str()).collect();
            sequences.add(sequence.join(" "));
        }

        if let Some(opening) = book.classify_moves(moves) {
            named.add((opening.eco, opening.name));
        }
    }

    let total = games.len();
    let first_moves = first
        .into_iter()
        .map(|(san, (count, white_wins))| {
            let stats = FirstMoveStats {
                count,
                percentage: percentage(count, total),
                win_rate: percentage(white_wins, count),
            };
            (san, stats)
        })
        .collect();

    OpeningStats {
        first_moves,
        popular_sequences: sequences
            .top(TOP_SEQUENCES)
            .into_iter()
            .map(|(moves, count)| SequenceCount { moves, count })
            .collect(),
        classified: named
            .top(TOP_NAMED)
            .into_iter()
            .map(|((eco, name), count)| NamedOpeningCount { eco, name, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_first_moves_and_sequences() {
        let italian = ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"];
        let games = vec![
            game("Ann", "Bob", "1-0", &italian),
            game("Cat", "Dan", "0-1", &italian),
            game("Eve", "Fay", "1-0", &["d4", "d5"]),
        ];
        let stats = calculate(&round(&games));

        let e4 = &stats.first_moves["e4"];
        assert_eq!(e4.count, 2);
        assert_eq!(e4.win_rate, 50.0);
        assert_eq!(stats.first_moves["d4"].win_rate, 100.0);

        assert_eq!(stats.popular_sequences.len(), 1);
        assert_eq!(stats.popular_sequences[0].moves, "e4 e5 Nf3 Nc6 Bc4 Bc5");
        assert_eq!(stats.popular_sequences[0].count, 2);
        assert_eq!(stats.classified[0].count, 2);
    }
}
