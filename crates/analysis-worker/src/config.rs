//! Worker configuration from environment variables and command-line flags

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

use crate::error::WorkerError;
use crate::round::RoundPolicy;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Postgres URL of the league database; only DB-backed commands need it.
    pub database_url: Option<String>,

    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Search depth per position
    pub engine_depth: u32,

    /// Analyse every Nth full move of each side
    pub sample_rate: usize,

    /// Number of Stockfish processes in the pool
    pub engine_workers: usize,

    /// Directory the JSON documents are written to
    pub output_dir: PathBuf,

    pub round_policy: RoundPolicy,

    /// Games a player needs before they get a highlights card
    pub highlight_min_games: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = RoundPolicy::default();

        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            stockfish_path: env::var("STOCKFISH_PATH").unwrap_or_else(|_| "stockfish".to_string()),
            engine_depth: env_or("ENGINE_DEPTH", 15),
            sample_rate: env_or("ENGINE_SAMPLE_RATE", 2).max(1),
            engine_workers: env_or("ENGINE_WORKERS", num_cpus::get()).max(1),
            output_dir: env::var("STATS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/stats")),
            round_policy: RoundPolicy {
                expected_games: env_or("EXPECTED_GAMES", defaults.expected_games),
                completion_threshold: env_or("COMPLETION_THRESHOLD", defaults.completion_threshold),
                round_length: env::var("ROUND_LENGTH_DAYS")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .map(Duration::days)
                    .unwrap_or(defaults.round_length),
            },
            highlight_min_games: env_or("HIGHLIGHT_MIN_GAMES", 3),
        }
    }

    pub fn require_database_url(&self) -> Result<&str, WorkerError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| WorkerError::Config("DATABASE_URL not set".to_string()))
    }
}

/// Per-invocation overrides shared by the worker binaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub season: Option<u32>,
    pub round: Option<u32>,
    pub no_engine: bool,
    /// PGN file or glob pattern to read instead of the database.
    pub input: Option<String>,
    pub output: Option<PathBuf>,
    pub help: bool,
}

fn flag_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, WorkerError> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| WorkerError::Config(format!("{flag} expects a value")))
}

/// Optional flags a binary can accept. `--help` is always accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Season,
    Round,
    Input,
    Output,
    NoEngine,
}

pub const ROUND_STATS_FLAGS: &[Flag] = &[Flag::Season, Flag::Round, Flag::Input, Flag::Output, Flag::NoEngine];
pub const HIGHLIGHTS_FLAGS: &[Flag] = &[Flag::Season, Flag::Input, Flag::Output, Flag::NoEngine];
pub const DETECTOR_FLAGS: &[Flag] = &[Flag::Season];

impl Flag {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "--season" | "-s" => Some(Flag::Season),
            "--round" | "-r" => Some(Flag::Round),
            "--input" | "-i" => Some(Flag::Input),
            "--output" | "-o" => Some(Flag::Output),
            "--no-engine" => Some(Flag::NoEngine),
            _ => None,
        }
    }
}

impl CliArgs {
    /// Parse flags, skipping the program name. Flags outside `allowed` are
    /// rejected rather than silently ignored.
    pub fn parse<I>(args: I, allowed: &[Flag]) -> Result<Self, WorkerError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter().skip(1);

        while let Some(arg) = args.next() {
            if matches!(arg.as_str(), "--help" | "-h") {
                parsed.help = true;
                continue;
            }
            let Some(flag) = Flag::from_arg(&arg) else {
                return Err(WorkerError::Config(format!("Unknown argument: {arg}")));
            };
            if !allowed.contains(&flag) {
                return Err(WorkerError::Config(format!("{arg} is not supported by this command")));
            }
            match flag {
                Flag::Season => parsed.season = Some(flag_value(&arg, args.next())?),
                Flag::Round => parsed.round = Some(flag_value(&arg, args.next())?),
                Flag::Input => parsed.input = Some(flag_value(&arg, args.next())?),
                Flag::Output => parsed.output = Some(flag_value(&arg, args.next())?),
                Flag::NoEngine => parsed.no_engine = true,
            }
        }

        Ok(parsed)
    }

    pub fn from_env(allowed: &[Flag]) -> Result<Self, WorkerError> {
        Self::parse(env::args(), allowed)
    }

    pub fn require_season(&self) -> Result<u32, WorkerError> {
        self.season
            .ok_or_else(|| WorkerError::Config("--season is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("bin")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = CliArgs::parse(
            args(&[
                "--season", "2", "-r", "5", "--no-engine", "--input", "games/*.pgn", "-o", "out.json",
            ]),
            ROUND_STATS_FLAGS,
        )
        .unwrap();

        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.round, Some(5));
        assert!(parsed.no_engine);
        assert_eq!(parsed.input.as_deref(), Some("games/*.pgn"));
        assert_eq!(parsed.output, Some(PathBuf::from("out.json")));
        assert!(!parsed.help);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(CliArgs::parse(args(&["--season"]), ROUND_STATS_FLAGS).is_err());
        assert!(CliArgs::parse(args(&["--season", "two"]), ROUND_STATS_FLAGS).is_err());
        assert!(CliArgs::parse(args(&["--verbose"]), ROUND_STATS_FLAGS).is_err());
    }

    #[test]
    fn test_detector_rejects_flags_it_never_reads() {
        let parsed = CliArgs::parse(args(&["-s", "3", "--help"]), DETECTOR_FLAGS).unwrap();
        assert_eq!(parsed.season, Some(3));
        assert!(parsed.help);

        for extra in [
            &["--round", "5"][..],
            &["--no-engine"][..],
            &["-i", "a.pgn"][..],
            &["--output", "x.json"][..],
        ] {
            let list: Vec<&str> = ["--season", "3"].iter().chain(extra).copied().collect();
            let err = CliArgs::parse(args(&list), DETECTOR_FLAGS).unwrap_err();
            assert!(err.to_string().contains("not supported"), "{extra:?}: {err}");
        }
    }

    #[test]
    fn test_highlights_reject_round() {
        assert!(CliArgs::parse(args(&["--round", "2"]), HIGHLIGHTS_FLAGS).is_err());
        let parsed = CliArgs::parse(args(&["--no-engine", "-o", "s.json"]), HIGHLIGHTS_FLAGS).unwrap();
        assert!(parsed.no_engine);
    }

    #[test]
    fn test_no_flags() {
        let parsed = CliArgs::parse(args(&[]), ROUND_STATS_FLAGS).unwrap();
        assert_eq!(parsed, CliArgs::default());
        assert!(parsed.require_season().is_err());
    }
}
