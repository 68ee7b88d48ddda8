//! Batch jobs for the league site: engine evaluation, round detection and
//! the runners that write the round and season JSON documents.

pub mod config;
pub mod db;
pub mod error;
pub mod evaluator;
pub mod games;
pub mod output;
pub mod round;
pub mod stockfish;

pub use config::{CliArgs, WorkerConfig};
pub use error::WorkerError;
pub use round::{detect_round, RoundDetection, RoundPolicy, RoundStatus};

use tracing_subscriber::EnvFilter;

/// Load `.env` first so a `RUST_LOG` set there reaches the log filter.
pub fn init_env() {
    let _ = dotenvy::dotenv();
    init_tracing();
}

/// Log to stderr so stdout stays free for JSON results.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();
}

/// `RUST_LOG` as currently set in the environment, `info` otherwise.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}
