//! Season highlights runner
//!
//! Loads every verified game of a season, evaluates them with the engine pool
//! unless `--no-engine` is given, and writes `season-{S}-highlights.json`.
//!
//! Usage:
//!   season-highlights [--season N] [--input 'games/*.pgn'] [--no-engine]

use std::collections::HashMap;

use analysis_worker::config::HIGHLIGHTS_FLAGS;
use analysis_worker::evaluator::evaluate_games;
use analysis_worker::games::{load_tagged, read_pgn_input, round_from_tag};
use analysis_worker::output::{highlights_file_name, write_json_atomic};
use analysis_worker::{db, init_env, CliArgs, WorkerConfig, WorkerError};
use chess_core::ParsedGame;
use round_stats::{GameEvaluation, HighlightConfig, SeasonGame, SeasonHighlights};
use tracing::info;

const USAGE: &str = "\
Usage: season-highlights [options]

Options:
  --season, -s <number>   Season number (default: active season)
  --input, -i <path>      PGN file or glob to read instead of the database
  --output, -o <path>     Output file (default: $STATS_OUTPUT_DIR/season-S-highlights.json)
  --no-engine             Skip Stockfish analysis
  --help, -h              Show this help message";

/// Season number plus `(round, pgn)` pairs.
async fn load_season(args: &CliArgs, config: &WorkerConfig) -> Result<(u32, Vec<(u32, String)>), WorkerError> {
    if let Some(pattern) = &args.input {
        let season = args.require_season()?;
        let pgns = read_pgn_input(pattern).await?;
        let tagged = pgns
            .into_iter()
            .map(|pgn| {
                let round = chess_core::pgn::parse_headers(&pgn)
                    .get("Round")
                    .and_then(|tag| round_from_tag(tag))
                    .unwrap_or(0);
                (round, pgn)
            })
            .collect();
        return Ok((season, tagged));
    }

    let pool = db::connect(config.require_database_url()?, 2).await?;
    let season = match args.season {
        Some(season) => season,
        None => db::fetch_season_snapshot(&pool, None).await?.season_number,
    };
    let pgns = db::fetch_season_pgns(&pool, season).await?;
    pool.close().await;
    Ok((season, pgns))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_env();

    let args = CliArgs::from_env(HIGHLIGHTS_FLAGS)?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = WorkerConfig::from_env();

    let (season, pgns) = load_season(&args, &config).await?;
    let (tagged, excluded) = load_tagged(pgns);
    info!(season, games = tagged.len(), excluded, "Loaded season games");

    let (rounds, games): (Vec<u32>, Vec<ParsedGame>) = tagged.into_iter().unzip();
    let evaluations = if args.no_engine || games.is_empty() {
        Vec::new()
    } else {
        evaluate_games(&config, &games).await
    };
    let mut by_index: HashMap<usize, GameEvaluation> = evaluations
        .into_iter()
        .map(|evaluation| (evaluation.game_index, evaluation))
        .collect();

    let season_games: Vec<SeasonGame> = rounds
        .into_iter()
        .zip(games)
        .enumerate()
        .map(|(index, (round, game))| SeasonGame {
            round,
            game,
            evaluation: by_index.remove(&index),
        })
        .collect();

    let highlight_config = HighlightConfig {
        min_games: config.highlight_min_games,
        ..HighlightConfig::default()
    };
    let document = SeasonHighlights::new(&season_games, season)
        .config(highlight_config)
        .build();

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(highlights_file_name(season)));
    write_json_atomic(&path, &document).await?;

    info!(season, players = document.player_count, "Season highlights complete");
    Ok(())
}
