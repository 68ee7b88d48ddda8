//! Engine evaluation of a round's games on a bounded pool of Stockfish processes.

use std::sync::Arc;

use chess_core::ParsedGame;
use round_stats::analysis::MATE_SCORE;
use round_stats::{GameEvaluation, PlyEvaluation};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::stockfish::StockfishEngine;

/// Whether `ply` is analysed: every `sample_rate`-th full move, both colours.
pub fn is_sampled(ply: usize, sample_rate: usize) -> bool {
    (ply / 2) % sample_rate.max(1) == 0
}

/// FEN after the move at `ply`. The last move is replayed since no later
/// record carries the resulting position.
pub fn fen_after(game: &ParsedGame, ply: usize) -> Result<String, WorkerError> {
    if let Some(next) = game.moves.get(ply + 1) {
        return Ok(next.fen_before.clone());
    }

    let record = game
        .moves
        .get(ply)
        .ok_or_else(|| WorkerError::Stockfish(format!("no move at ply {ply}")))?;
    let replay_error = |e: String| WorkerError::Stockfish(format!("cannot replay {}: {e}", record.uci));

    let pos: Chess = Fen::from_ascii(record.fen_before.as_bytes())
        .map_err(|e| replay_error(e.to_string()))?
        .into_position(CastlingMode::Standard)
        .map_err(|e| replay_error(e.to_string()))?;
    let mv = UciMove::from_ascii(record.uci.as_bytes())
        .map_err(|e| replay_error(e.to_string()))?
        .to_move(&pos)
        .map_err(|e| replay_error(e.to_string()))?;

    let mut pos = pos;
    pos.play_unchecked(mv);
    Ok(Fen::from_position(&pos, EnPassantMode::Legal).to_string())
}

/// Evaluate the sampled plies of one game, scores from the mover's side.
pub async fn evaluate_game(
    engine: &mut StockfishEngine,
    game_index: usize,
    game: &ParsedGame,
    depth: u32,
    sample_rate: usize,
) -> Result<GameEvaluation, WorkerError> {
    engine.new_game().await?;

    let mut plies = Vec::new();
    for (ply, record) in game.moves.iter().enumerate() {
        if !is_sampled(ply, sample_rate) {
            continue;
        }

        let before = engine.evaluate(&record.fen_before, depth).await?;
        let eval_after = if record.flags.checkmate {
            MATE_SCORE
        } else {
            let fen = fen_after(game, ply)?;
            -engine.evaluate(&fen, depth).await?.score()
        };

        plies.push(PlyEvaluation {
            ply,
            eval_before: before.score(),
            eval_after,
            best_move: before.best_move,
        });
    }

    debug!(game_index, analysed = plies.len(), "game evaluated");
    Ok(GameEvaluation { game_index, plies })
}

/// Idle items waiting to be checked out. A checkout takes whichever item is
/// free, so no task waits on a busy item while another sits idle.
pub struct IdleQueue<E> {
    tx: mpsc::UnboundedSender<E>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<E>>>,
}

impl<E> Clone for IdleQueue<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<E> IdleQueue<E> {
    pub fn new(items: impl IntoIterator<Item = E>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        for item in items {
            // The receiver lives in the queue, so sending cannot fail.
            let _ = tx.send(item);
        }
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Wait for a free item.
    pub async fn checkout(&self) -> Option<E> {
        self.rx.lock().await.recv().await
    }

    pub fn checkin(&self, item: E) {
        let _ = self.tx.send(item);
    }

    /// Take every item currently idle.
    pub async fn drain(&self) -> Vec<E> {
        let mut rx = self.rx.lock().await;
        let mut items = Vec::new();
        while let Ok(item) = rx.try_recv() {
            items.push(item);
        }
        items
    }
}

/// Fixed set of engines shared by concurrent game evaluations.
pub struct EnginePool {
    idle: IdleQueue<StockfishEngine>,
    depth: u32,
    sample_rate: usize,
}

impl EnginePool {
    pub async fn spawn(config: &WorkerConfig) -> Result<Self, WorkerError> {
        let workers = config.engine_workers.max(1);
        info!(workers, depth = config.engine_depth, "Creating Stockfish engine pool");

        let mut engines = Vec::with_capacity(workers);
        for engine_id in 0..workers {
            let engine = StockfishEngine::new(&config.stockfish_path).await?;
            debug!(engine_id, "Stockfish engine ready");
            engines.push(engine);
        }

        Ok(Self {
            idle: IdleQueue::new(engines),
            depth: config.engine_depth,
            sample_rate: config.sample_rate,
        })
    }

    /// Evaluate every game; failures are logged and the game is left out.
    pub async fn evaluate_round(&self, games: &[ParsedGame]) -> Vec<GameEvaluation> {
        let mut handles = Vec::with_capacity(games.len());

        for (game_index, game) in games.iter().enumerate() {
            let idle = self.idle.clone();
            let game = game.clone();
            let (depth, sample_rate) = (self.depth, self.sample_rate);

            handles.push(tokio::spawn(async move {
                let mut engine = idle
                    .checkout()
                    .await
                    .ok_or_else(|| WorkerError::Stockfish("engine pool closed".to_string()))?;
                let result = evaluate_game(&mut engine, game_index, &game, depth, sample_rate).await;
                idle.checkin(engine);
                result
            }));
        }

        let mut evaluations = Vec::with_capacity(handles.len());
        for (game_index, outcome) in futures::future::join_all(handles).await.into_iter().enumerate() {
            match outcome {
                Ok(Ok(evaluation)) => evaluations.push(evaluation),
                Ok(Err(e)) => warn!(game_index, error = %e, "Engine evaluation failed, skipping game"),
                Err(e) => error!(game_index, error = %e, "Evaluation task panicked"),
            }
        }

        info!(
            evaluated = evaluations.len(),
            total = games.len(),
            "Round evaluation complete"
        );
        evaluations
    }

    pub async fn shutdown(self) {
        info!("Shutting down Stockfish engines");
        for mut engine in self.idle.drain().await {
            engine.quit().await;
        }
    }
}

/// Spin up a pool, evaluate `games` and shut it down. An engine that cannot
/// start means no evaluations rather than a failed run.
pub async fn evaluate_games(config: &WorkerConfig, games: &[ParsedGame]) -> Vec<GameEvaluation> {
    match EnginePool::spawn(config).await {
        Ok(pool) => {
            let evaluations = pool.evaluate_round(games).await;
            pool.shutdown().await;
            evaluations
        }
        Err(e) => {
            warn!(error = %e, "Engine unavailable, continuing without evaluations");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::pgn::parse_pgn;
    use std::time::Duration;

    const FOOLS_MATE: &str = "[White \"a\"]\n[Black \"b\"]\n[Result \"0-1\"]\n\n1. f3 e5 2. g4 Qh4# 0-1";

    #[test]
    fn test_sampling_covers_both_colours() {
        let sampled: Vec<usize> = (0..10).filter(|&ply| is_sampled(ply, 2)).collect();
        assert_eq!(sampled, [0, 1, 4, 5, 8, 9]);

        let every: Vec<usize> = (0..4).filter(|&ply| is_sampled(ply, 1)).collect();
        assert_eq!(every, [0, 1, 2, 3]);
        assert!(is_sampled(3, 0));
    }

    #[test]
    fn test_fen_after_uses_next_record() {
        let game = parse_pgn(FOOLS_MATE).unwrap();
        assert_eq!(fen_after(&game, 0).unwrap(), game.moves[1].fen_before);
    }

    #[test]
    fn test_fen_after_replays_last_move() {
        let game = parse_pgn(FOOLS_MATE).unwrap();
        assert_eq!(
            fen_after(&game, 3).unwrap(),
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
        );
        assert!(fen_after(&game, 4).is_err());
    }

    #[tokio::test]
    async fn test_checkout_takes_any_idle_engine() {
        let idle = IdleQueue::new([1, 2]);
        let first = idle.checkout().await.unwrap();
        let second = idle.checkout().await.unwrap();
        assert_ne!(first, second);

        let busy = tokio::time::timeout(Duration::from_millis(50), idle.checkout()).await;
        assert!(busy.is_err());

        idle.checkin(second);
        assert_eq!(idle.checkout().await, Some(second));
        idle.checkin(first);
        assert_eq!(idle.drain().await, vec![first]);
    }

    #[tokio::test]
    async fn test_waiting_checkout_wakes_on_checkin() {
        let idle = IdleQueue::new([7]);
        let held = idle.checkout().await.unwrap();

        let waiter = tokio::spawn({
            let idle = idle.clone();
            async move { idle.checkout().await }
        });
        tokio::task::yield_now().await;
        idle.checkin(held);
        assert_eq!(waiter.await.unwrap(), Some(7));
    }
}
