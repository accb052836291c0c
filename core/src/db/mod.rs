//! SQLite access for the comparison core.
//!
//! The data store is a pre-populated, read-only boxscore database. Connections
//! are opened per call and dropped when done; at the expected request rate a
//! pool buys nothing and the per-call open keeps the two answer paths free of
//! shared state.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::GameInfo;

/// Open a read-only connection to the boxscore database.
pub async fn open_readonly(db_path: &Path) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let conn = SqliteConnection::connect_with(&options)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    Ok(conn)
}

/// All finished games that have both a database record and an existing
/// screenshot file, most recent first.
///
/// Games whose screenshot path is missing on disk are skipped rather than
/// surfaced, so every returned game is eligible for both answer engines.
pub async fn games_with_screenshots(config: &Config) -> Result<Vec<GameInfo>> {
    if !config.db_path.exists() {
        warn!("Database not found at {}", config.db_path.display());
        return Ok(Vec::new());
    }

    let mut conn = open_readonly(&config.db_path).await?;

    let rows = sqlx::query(
        r#"
        SELECT DISTINCT
            g.game_id,
            g.away_team_name,
            g.away_team_abbrev,
            g.away_team_score,
            g.home_team_name,
            g.home_team_abbrev,
            g.home_team_score,
            g.status,
            g.game_date,
            s.file_path
        FROM games g
        INNER JOIN screenshots s ON g.game_id = s.game_id
        WHERE g.status LIKE '%FINAL%'
        ORDER BY g.game_date DESC
        "#,
    )
    .fetch_all(&mut conn)
    .await
    .context("Failed to query games with screenshots")?;

    let mut games = Vec::new();
    for row in rows {
        let file_path: Option<String> = row.try_get("file_path")?;
        let Some(file_path) = file_path else {
            continue;
        };

        let mut screenshot_path = std::path::PathBuf::from(file_path);
        if screenshot_path.is_relative() {
            screenshot_path = config.base_dir.join(screenshot_path);
        }
        if !screenshot_path.exists() {
            debug!(
                "Skipping game with missing screenshot: {}",
                screenshot_path.display()
            );
            continue;
        }

        games.push(GameInfo {
            game_id: row.try_get("game_id")?,
            away_team: row
                .try_get::<Option<String>, _>("away_team_name")?
                .unwrap_or_else(|| "Away".to_string()),
            away_abbrev: row
                .try_get::<Option<String>, _>("away_team_abbrev")?
                .unwrap_or_else(|| "AWY".to_string()),
            away_score: row
                .try_get::<Option<i64>, _>("away_team_score")?
                .unwrap_or(0),
            home_team: row
                .try_get::<Option<String>, _>("home_team_name")?
                .unwrap_or_else(|| "Home".to_string()),
            home_abbrev: row
                .try_get::<Option<String>, _>("home_team_abbrev")?
                .unwrap_or_else(|| "HME".to_string()),
            home_score: row
                .try_get::<Option<i64>, _>("home_team_score")?
                .unwrap_or(0),
            status: row
                .try_get::<Option<String>, _>("status")?
                .unwrap_or_else(|| "Final".to_string()),
            game_date: row
                .try_get::<Option<String>, _>("game_date")?
                .unwrap_or_default(),
            screenshot_path,
        });
    }

    debug!("Found {} games with screenshots", games.len());
    Ok(games)
}

/// Run an arbitrary SELECT and decode every row into ordered pairs.
///
/// Both SQL answer paths funnel through this: the statement text is executed
/// verbatim on a fresh read-only connection.
pub async fn fetch_all_pairs(db_path: &Path, sql: &str) -> Result<Vec<Vec<(String, String)>>> {
    let mut conn = open_readonly(db_path).await?;
    let rows = sqlx::query(sql).fetch_all(&mut conn).await?;
    Ok(rows.iter().map(row_to_pairs).collect())
}

/// Decode a row into ordered (column, value) pairs.
///
/// Result columns are dynamically typed (templates and model-generated SQL
/// produce expression columns), so each value is stringified from whatever
/// storage class SQLite hands back.
pub fn row_to_pairs(row: &SqliteRow) -> Vec<(String, String)> {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), decode_value(row, col.ordinal())))
        .collect()
}

fn decode_value(row: &SqliteRow, idx: usize) -> String {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) => {
            if raw.is_null() {
                return "NULL".to_string();
            }
            let info = raw.type_info();
            info.name().to_string()
        }
        Err(_) => return "NULL".to_string(),
    };

    let decoded = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => row.try_get::<i64, _>(idx).map(|v| v.to_string()).ok(),
        "REAL" => row.try_get::<f64, _>(idx).map(format_real).ok(),
        "TEXT" | "DATETIME" | "DATE" => row.try_get::<String, _>(idx).ok(),
        _ => None,
    };

    decoded
        .or_else(|| row.try_get::<i64, _>(idx).map(|v| v.to_string()).ok())
        .or_else(|| row.try_get::<f64, _>(idx).map(format_real).ok())
        .or_else(|| row.try_get::<String, _>(idx).ok())
        .unwrap_or_else(|| "?".to_string())
}

/// Render a REAL the way SQLite itself prints one (55.0, not 55).
fn format_real(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}
