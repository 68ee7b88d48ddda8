//! Database queries for seasons, rounds and verified game PGNs

use std::time::Duration;

use chrono::NaiveDateTime;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::error::WorkerError;
use crate::round::{RoundSnapshot, SeasonSnapshot};

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, WorkerError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;
    info!(max_connections, "Database connection pool established");
    Ok(pool)
}

/// Season id and number: the requested season, or the active one.
async fn fetch_season(pool: &PgPool, season: Option<u32>) -> Result<(String, u32), WorkerError> {
    match season {
        Some(number) => {
            let row: Option<(String, i32)> = sqlx::query_as(
                r#"SELECT id, "seasonNumber" FROM "Season" WHERE "seasonNumber" = $1 LIMIT 1"#,
            )
            .bind(number as i32)
            .fetch_optional(pool)
            .await?;
            row.map(|(id, n)| (id, n as u32))
                .ok_or(WorkerError::SeasonNotFound(number))
        }
        None => {
            let row: Option<(String, i32)> = sqlx::query_as(
                r#"SELECT id, "seasonNumber" FROM "Season" WHERE "isActive" = true
                   ORDER BY "seasonNumber" DESC LIMIT 1"#,
            )
            .fetch_optional(pool)
            .await?;
            row.map(|(id, n)| (id, n as u32))
                .ok_or(WorkerError::NoActiveSeason)
        }
    }
}

/// A season's rounds in ascending order with their verified game counts.
pub async fn fetch_season_snapshot(
    pool: &PgPool,
    season: Option<u32>,
) -> Result<SeasonSnapshot, WorkerError> {
    let (season_id, season_number) = fetch_season(pool, season).await?;

    let rows: Vec<(String, i32, NaiveDateTime, i64)> = sqlx::query_as(
        r#"SELECT r.id, r."roundNumber", r."roundDate",
                  COUNT(g.id) FILTER (WHERE g."isVerified")
           FROM "Round" r
           LEFT JOIN "GameResult" g ON g."roundId" = r.id
           WHERE r."seasonId" = $1
           GROUP BY r.id, r."roundNumber", r."roundDate"
           ORDER BY r."roundNumber" ASC"#,
    )
    .bind(&season_id)
    .fetch_all(pool)
    .await?;

    let rounds = rows
        .into_iter()
        .map(|(id, round_number, round_date, verified)| RoundSnapshot {
            id,
            round_number: round_number as u32,
            round_date: round_date.and_utc(),
            verified_games: verified as u32,
        })
        .collect();

    Ok(SeasonSnapshot {
        season_number,
        rounds,
    })
}

/// Verified PGNs of one round, by board number.
pub async fn fetch_round_pgns(
    pool: &PgPool,
    season_number: u32,
    round_number: u32,
) -> Result<Vec<String>, WorkerError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"SELECT g.pgn
           FROM "GameResult" g
           JOIN "Round" r ON r.id = g."roundId"
           JOIN "Season" s ON s.id = r."seasonId"
           WHERE s."seasonNumber" = $1 AND r."roundNumber" = $2
             AND g."isVerified" = true AND g.pgn IS NOT NULL
           ORDER BY g."boardNumber" ASC NULLS LAST, g.id ASC"#,
    )
    .bind(season_number as i32)
    .bind(round_number as i32)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(pgn,)| pgn).collect())
}

/// Verified PGNs of a whole season, tagged with their round number.
pub async fn fetch_season_pgns(
    pool: &PgPool,
    season_number: u32,
) -> Result<Vec<(u32, String)>, WorkerError> {
    let rows: Vec<(i32, String)> = sqlx::query_as(
        r#"SELECT r."roundNumber", g.pgn
           FROM "GameResult" g
           JOIN "Round" r ON r.id = g."roundId"
           JOIN "Season" s ON s.id = r."seasonId"
           WHERE s."seasonNumber" = $1
             AND g."isVerified" = true AND g.pgn IS NOT NULL
           ORDER BY r."roundNumber" ASC, g."boardNumber" ASC NULLS LAST, g.id ASC"#,
    )
    .bind(season_number as i32)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(round, pgn)| (round as u32, pgn))
        .collect())
}
