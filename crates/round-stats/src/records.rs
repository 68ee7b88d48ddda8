//! Small shared building blocks for section outputs.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::scanner::RoundGame;

/// Which game a record points at, flattened into every award-style record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    pub game_index: usize,
    pub white: String,
    pub black: String,
}

impl GameRef {
    pub fn of(game: &RoundGame<'_>) -> Self {
        Self {
            game_index: game.index,
            white: game.game.white_name().to_string(),
            black: game.game.black_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Highest,
    Lowest,
}

/// Running best across games. A candidate only replaces the current leader
/// when it is strictly better, so the earliest game wins ties.
#[derive(Debug, Clone)]
pub struct Leader<K, T> {
    direction: Direction,
    best: Option<(K, T)>,
}

impl<K: PartialOrd + Copy, T> Leader<K, T> {
    pub fn highest() -> Self {
        Self {
            direction: Direction::Highest,
            best: None,
        }
    }

    pub fn lowest() -> Self {
        Self {
            direction: Direction::Lowest,
            best: None,
        }
    }

    pub fn offer(&mut self, key: K, make: impl FnOnce() -> T) {
        let better = match (&self.best, self.direction) {
            (None, _) => true,
            (Some((best, _)), Direction::Highest) => key > *best,
            (Some((best, _)), Direction::Lowest) => key < *best,
        };
        if better {
            self.best = Some((key, make()));
        }
    }

    pub fn key(&self) -> Option<K> {
        self.best.as_ref().map(|(k, _)| *k)
    }

    pub fn into_inner(self) -> Option<T> {
        self.best.map(|(_, item)| item)
    }
}

/// Counts keyed by first appearance, so a stable sort keeps first-seen order on ties.
pub struct Tally<K> {
    order: Vec<K>,
    counts: HashMap<K, usize>,
}

impl<K: Hash + Eq + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        let count = self.counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            self.order.push(key);
        }
        *count += 1;
    }

    pub fn top(self, limit: usize) -> Vec<(K, usize)> {
        let mut ranked: Vec<(K, usize)> = self
            .order
            .into_iter()
            .map(|k| {
                let count = self.counts.get(&k).copied().unwrap_or(0);
                (k, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

impl<K: Hash + Eq + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
