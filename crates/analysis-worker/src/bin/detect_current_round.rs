//! Round detection
//!
//! Prints which round of a season should be analyzed as JSON on stdout.
//! Failures print `{"error": ..., "shouldAnalyze": false}` and exit 1.
//!
//! Usage:
//!   detect-current-round [--season N]

use std::process::ExitCode;

use analysis_worker::config::DETECTOR_FLAGS;
use analysis_worker::{db, detect_round, init_env, CliArgs, RoundDetection, WorkerConfig, WorkerError};
use chrono::Utc;
use serde::Serialize;

const USAGE: &str = "\
Usage: detect-current-round [options]

Options:
  --season, -s <number>   Specific season number (default: active season)
  --help, -h              Show this help message";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionFailure {
    error: String,
    should_analyze: bool,
}

async fn detect(args: &CliArgs) -> Result<RoundDetection, WorkerError> {
    let config = WorkerConfig::from_env();
    let pool = db::connect(config.require_database_url()?, 1).await?;
    let snapshot = db::fetch_season_snapshot(&pool, args.season).await;
    pool.close().await;
    detect_round(&snapshot?, Utc::now(), &config.round_policy)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_env();

    let result = match CliArgs::from_env(DETECTOR_FLAGS) {
        Ok(args) if args.help => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(args) => detect(&args).await,
        Err(e) => Err(e),
    };

    let printed = match result {
        Ok(detection) => serde_json::to_string_pretty(&detection).map(|json| (json, ExitCode::SUCCESS)),
        Err(e) => {
            tracing::error!(error = %e, "Round detection failed");
            serde_json::to_string(&DetectionFailure {
                error: e.to_string(),
                should_analyze: false,
            })
            .map(|json| (json, ExitCode::FAILURE))
        }
    };

    match printed {
        Ok((json, code)) => {
            println!("{json}");
            code
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
