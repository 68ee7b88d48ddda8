//! Single-pass scanners over a round's games.
//!
//! Each statistic owns its running state and is driven move by move by
//! [`run_scanner`], so no statistic can observe another's state.

use chess_core::moves::{PieceTracker, TrackedMove};
use chess_core::{segment, GamePhases, MoveRecord, ParsedGame, Phase, PhaseConfig};

/// A parsed game plus what every calculator needs precomputed.
#[derive(Debug, Clone)]
pub struct RoundGame<'a> {
    /// Position in the round's input order; ties are broken on this.
    pub index: usize,
    pub game: &'a ParsedGame,
    pub phases: GamePhases,
}

impl<'a> RoundGame<'a> {
    pub fn new(index: usize, game: &'a ParsedGame, config: &PhaseConfig) -> Self {
        Self {
            index,
            game,
            phases: segment(&game.moves, config),
        }
    }

    pub fn moves(&self) -> &'a [MoveRecord] {
        &self.game.moves
    }
}

/// Wrap games in input order with their phase boundaries.
pub fn prepare<'a>(games: &'a [ParsedGame], config: &PhaseConfig) -> Vec<RoundGame<'a>> {
    games
        .iter()
        .enumerate()
        .map(|(index, game)| RoundGame::new(index, game, config))
        .collect()
}

/// Context available to scanners at each ply.
pub struct MoveContext<'a> {
    pub mv: &'a MoveRecord,
    pub ply: usize, // 0-indexed
    pub phase: Phase,
    /// Piece instances (by starting square) that moved and were captured.
    pub tracked: TrackedMove,
    pub game: &'a RoundGame<'a>,
}

pub trait GameScanner {
    type Output;

    /// Reset per-game state.
    fn start_game(&mut self, _game: &RoundGame<'_>) {}

    fn process_move(&mut self, ctx: &MoveContext<'_>);

    /// Fold the finished game into the round-wide result.
    fn finish_game(&mut self, _game: &RoundGame<'_>) {}

    fn finish(self) -> Self::Output;
}

/// Drive one scanner over every game in input order.
pub fn run_scanner<S: GameScanner>(mut scanner: S, games: &[RoundGame<'_>]) -> S::Output {
    for game in games {
        scanner.start_game(game);
        let mut tracker = PieceTracker::new();

        for (ply, mv) in game.moves().iter().enumerate() {
            let tracked = tracker.apply(mv);
            let ctx = MoveContext {
                mv,
                ply,
                phase: game.phases.phase_of(ply),
                tracked,
                game,
            };
            scanner.process_move(&ctx);
        }

        scanner.finish_game(game);
    }
    scanner.finish()
}
