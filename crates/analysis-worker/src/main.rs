//! Round statistics runner
//!
//! Loads one round's verified games (from Postgres or a PGN file), runs the
//! Stockfish pool over them unless `--no-engine` is given, and writes
//! `season-{S}-round-{R}.json`.

use analysis_worker::config::ROUND_STATS_FLAGS;
use analysis_worker::evaluator::evaluate_games;
use analysis_worker::games::{load_games, read_pgn_input};
use analysis_worker::output::{round_file_name, write_json_atomic};
use analysis_worker::{db, detect_round, init_env, CliArgs, WorkerConfig, WorkerError};
use chrono::Utc;
use round_stats::RoundStats;
use tracing::info;

const USAGE: &str = "\
Usage: round-stats [options]

Options:
  --season, -s <number>   Season number (default: active season)
  --round, -r <number>    Round number (default: detected current round)
  --input, -i <path>      PGN file or glob to read instead of the database
  --output, -o <path>     Output file (default: $STATS_OUTPUT_DIR/season-S-round-R.json)
  --no-engine             Skip Stockfish analysis
  --help, -h              Show this help message";

/// Which round to build and where its games come from.
struct RoundInput {
    season: u32,
    round: u32,
    pgns: Vec<String>,
}

async fn resolve_input(args: &CliArgs, config: &WorkerConfig) -> Result<Option<RoundInput>, WorkerError> {
    if let Some(pattern) = &args.input {
        let season = args.require_season()?;
        let round = args
            .round
            .ok_or_else(|| WorkerError::Config("--round is required with --input".to_string()))?;
        return Ok(Some(RoundInput {
            season,
            round,
            pgns: read_pgn_input(pattern).await?,
        }));
    }

    let pool = db::connect(config.require_database_url()?, 2).await?;

    let (season, round) = match (args.season, args.round) {
        (Some(season), Some(round)) => (season, round),
        (season, _) => {
            let snapshot = db::fetch_season_snapshot(&pool, season).await?;
            let detection = detect_round(&snapshot, Utc::now(), &config.round_policy)?;
            info!(
                season = detection.season_number,
                round_number = detection.round_number,
                status = ?detection.status,
                games = detection.game_count,
                "Detected round"
            );
            if args.round.is_none() && !detection.should_analyze {
                info!("Every round is complete, nothing to analyze");
                return Ok(None);
            }
            (detection.season_number, args.round.unwrap_or(detection.round_number))
        }
    };

    let pgns = db::fetch_round_pgns(&pool, season, round).await?;
    pool.close().await;
    Ok(Some(RoundInput { season, round, pgns }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_env();

    let args = CliArgs::from_env(ROUND_STATS_FLAGS)?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = WorkerConfig::from_env();

    let Some(input) = resolve_input(&args, &config).await? else {
        return Ok(());
    };

    let loaded = load_games(input.pgns);
    info!(
        season = input.season,
        round_number = input.round,
        games = loaded.games.len(),
        excluded = loaded.excluded,
        "Loaded round games"
    );

    let evaluations = if args.no_engine || loaded.games.is_empty() {
        Vec::new()
    } else {
        evaluate_games(&config, &loaded.games).await
    };

    let document = RoundStats::new(&loaded.games, input.round, input.season)
        .excluded_games(loaded.excluded)
        .evaluations(&evaluations)
        .build()?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(round_file_name(input.season, input.round)));
    write_json_atomic(&path, &document).await?;

    info!(
        season = input.season,
        round_number = input.round,
        analysed = document.analysis.as_ref().map_or(0, |a| a.summary.games_analyzed),
        "Round stats complete"
    );
    Ok(())
}
