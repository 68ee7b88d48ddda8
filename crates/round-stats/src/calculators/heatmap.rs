use std::collections::BTreeMap;

use serde::Serialize;
use shakmaty::Square;

use crate::scanner::RoundGame;

const TOP_SQUARES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquareCount {
    pub square: String,
    pub count: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardHeatmap {
    /// Keyed by square name (`a1`..`h8`), all 64 squares present.
    pub visits: BTreeMap<String, u32>,
    pub captures: BTreeMap<String, u32>,
    pub bloodiest_square: Option<SquareCount>,
    pub most_popular_square: Option<SquareCount>,
    pub least_popular_square: Option<SquareCount>,
    /// Squares no piece ever moved to.
    pub quietest_squares: Vec<String>,
    #[serde(rename = "top5Bloodiest")]
    pub top_bloodiest: Vec<SquareCount>,
    #[serde(rename = "top5Popular")]
    pub top_popular: Vec<SquareCount>,
}

fn empty_board() -> BTreeMap<String, u32> {
    (0..64u32).map(|i| (Square::new(i).to_string(), 0)).collect()
}

/// Squares sorted by count descending; equal counts keep board order.
fn ranked(counts: &BTreeMap<String, u32>) -> Vec<(&String, u32)> {
    let mut ranked: Vec<(&String, u32)> = counts.iter().map(|(sq, c)| (sq, *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn describe(square: &str, count: u32, what: &str) -> SquareCount {
    SquareCount {
        square: square.to_string(),
        count,
        description: format!("{square} saw {count} {what}"),
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> BoardHeatmap {
    let mut visits = empty_board();
    let mut captures = empty_board();

    for game in games {
        for mv in game.moves() {
            let square = mv.to.to_string();
            *visits.entry(square.clone()).or_insert(0) += 1;
            if mv.is_capture() {
                *captures.entry(square).or_insert(0) += 1;
            }
        }
    }

    let by_visits = ranked(&visits);
    let by_captures = ranked(&captures);

    let most_popular_square = by_visits
        .first()
        .filter(|(_, count)| *count > 0)
        .map(|(sq, count)| describe(sq, *count, "moves"));
    let bloodiest_square = by_captures
        .first()
        .filter(|(_, count)| *count > 0)
        .map(|(sq, count)| describe(sq, *count, "captures"));
    // Least popular among squares that were visited at all; ties go to the
    // last such square in board order.
    let least_popular_square = by_visits
        .iter()
        .rev()
        .find(|(_, count)| *count > 0)
        .map(|(sq, count)| describe(sq, *count, "moves"));

    let top = |ranked: &[(&String, u32)], what: &str| -> Vec<SquareCount> {
        ranked
            .iter()
            .filter(|(_, count)| *count > 0)
            .take(TOP_SQUARES)
            .map(|(sq, count)| describe(sq, *count, what))
            .collect()
    };

    BoardHeatmap {
        quietest_squares: visits
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(sq, _)| sq.clone())
            .collect(),
        top_bloodiest: top(&by_captures, "captures"),
        top_popular: top(&by_visits, "moves"),
        bloodiest_square,
        most_popular_square,
        least_popular_square,
        visits,
        captures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_visits_cover_every_ply() {
        let games = vec![
            game("Ann", "Bob", "*", &["e4", "d5", "exd5", "Qxd5"]),
            game("Cat", "Dan", "*", &["e4", "e5"]),
        ];
        let heatmap = calculate(&round(&games));

        assert_eq!(heatmap.visits.len(), 64);
        assert_eq!(heatmap.visits.values().sum::<u32>(), 6);
        assert_eq!(heatmap.captures.values().sum::<u32>(), 2);
        assert_eq!(heatmap.visits["e4"], 2);
        assert_eq!(heatmap.captures["d5"], 2);

        assert_eq!(heatmap.most_popular_square.unwrap().square, "d5");
        assert_eq!(heatmap.bloodiest_square.unwrap().count, 2);
        assert_eq!(heatmap.quietest_squares.len(), 61);
        assert_eq!(heatmap.top_popular.len(), 3);
    }

    #[test]
    fn test_least_popular_tie_takes_last_square() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "e5", "Nf3", "Nc6", "Nxe5"])];
        let heatmap = calculate(&round(&games));

        assert_eq!(heatmap.most_popular_square.unwrap().square, "e5");
        let least = heatmap.least_popular_square.unwrap();
        assert_eq!(least.square, "f3");
        assert_eq!(least.count, 1);
    }

    #[test]
    fn test_empty_round_has_no_extremes() {
        let heatmap = calculate(&[]);
        assert!(heatmap.most_popular_square.is_none());
        assert!(heatmap.least_popular_square.is_none());
        assert!(heatmap.bloodiest_square.is_none());
        assert_eq!(heatmap.quietest_squares.len(), 64);
    }
}
