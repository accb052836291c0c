//! Semantic layer integration tests against a seeded SQLite database.
//!
//! The fixture is a two-team game (Gonzaga at Duke) with enough player rows
//! to exercise single-row, multi-row, empty, and failing query paths.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tempfile::TempDir;

use courtvision_core::semantic::{
    executor, matcher::MatchParams, Rule, SemanticLayer, NO_DATA_MESSAGE,
};

const GAME_ID: &str = "401700123";
const CROWDED_GAME_ID: &str = "401700456";

struct SeedPlayer {
    name: &'static str,
    team: &'static str,
    position: &'static str,
    points: i64,
    rebounds: i64,
    assists: i64,
    turnovers: i64,
    fg_made: i64,
    fg_attempted: i64,
    starter: i64,
}

const PLAYERS: &[SeedPlayer] = &[
    SeedPlayer { name: "Graham Ike", team: "Gonzaga Bulldogs", position: "F", points: 24, rebounds: 9, assists: 2, turnovers: 3, fg_made: 10, fg_attempted: 18, starter: 1 },
    SeedPlayer { name: "Ryan Nembhard", team: "Gonzaga Bulldogs", position: "G", points: 18, rebounds: 3, assists: 9, turnovers: 2, fg_made: 7, fg_attempted: 15, starter: 1 },
    SeedPlayer { name: "Ben Gregg", team: "Gonzaga Bulldogs", position: "F", points: 8, rebounds: 11, assists: 1, turnovers: 1, fg_made: 3, fg_attempted: 8, starter: 0 },
    SeedPlayer { name: "Cooper Flagg", team: "Duke Blue Devils", position: "F", points: 21, rebounds: 10, assists: 4, turnovers: 4, fg_made: 8, fg_attempted: 17, starter: 1 },
    SeedPlayer { name: "Kon Knueppel", team: "Duke Blue Devils", position: "G", points: 15, rebounds: 4, assists: 3, turnovers: 1, fg_made: 5, fg_attempted: 12, starter: 1 },
    SeedPlayer { name: "Tyrese Proctor", team: "Duke Blue Devils", position: "G", points: 12, rebounds: 2, assists: 5, turnovers: 2, fg_made: 4, fg_attempted: 11, starter: 0 },
];

async fn open_writable(path: &Path) -> SqliteConnection {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqliteConnection::connect_with(&options).await.unwrap()
}

async fn seed_database(path: &Path) {
    let mut conn = open_writable(path).await;

    for ddl in [
        "CREATE TABLE games (
            game_id TEXT PRIMARY KEY,
            away_team_name TEXT, away_team_abbrev TEXT, away_team_score INTEGER,
            home_team_name TEXT, home_team_abbrev TEXT, home_team_score INTEGER,
            status TEXT, game_date TEXT
        )",
        "CREATE TABLE players (
            game_id TEXT, player_name TEXT, team_name TEXT, position TEXT,
            minutes INTEGER, points INTEGER,
            rebounds INTEGER, offensive_rebounds INTEGER, defensive_rebounds INTEGER,
            assists INTEGER, steals INTEGER, blocks INTEGER,
            turnovers INTEGER, fouls INTEGER,
            fg_made INTEGER, fg_attempted INTEGER,
            fg3_made INTEGER, fg3_attempted INTEGER,
            starter INTEGER
        )",
        "CREATE TABLE screenshots (game_id TEXT, file_path TEXT)",
    ] {
        sqlx::query(ddl).execute(&mut conn).await.unwrap();
    }

    sqlx::query(
        "INSERT INTO games VALUES (?, 'Gonzaga Bulldogs', 'GONZ', 78, 'Duke Blue Devils', 'DUKE', 72, 'FINAL', '2025-01-15')",
    )
    .bind(GAME_ID)
    .execute(&mut conn)
    .await
    .unwrap();

    for p in PLAYERS {
        sqlx::query(
            "INSERT INTO players VALUES (?, ?, ?, ?, 30, ?, ?, 2, ?, ?, 1, 0, ?, 2, ?, ?, 1, 4, ?)",
        )
        .bind(GAME_ID)
        .bind(p.name)
        .bind(p.team)
        .bind(p.position)
        .bind(p.points)
        .bind(p.rebounds)
        .bind(p.rebounds - 2)
        .bind(p.assists)
        .bind(p.turnovers)
        .bind(p.fg_made)
        .bind(p.fg_attempted)
        .bind(p.starter)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    // A second game where seven players record a double-double, to exercise
    // the multi-row cap.
    sqlx::query(
        "INSERT INTO games VALUES (?, 'Purdue Boilermakers', 'PUR', 80, 'Indiana Hoosiers', 'IND', 77, 'FINAL', '2025-01-18')",
    )
    .bind(CROWDED_GAME_ID)
    .execute(&mut conn)
    .await
    .unwrap();

    for i in 0..7i64 {
        sqlx::query(
            "INSERT INTO players VALUES (?, ?, 'Purdue Boilermakers', 'F', 28, 12, 11, 3, 8, 1, 0, 0, 1, 2, 5, 9, 0, 1, 1)",
        )
        .bind(CROWDED_GAME_ID)
        .bind(format!("Big Man {}", i))
        .execute(&mut conn)
        .await
        .unwrap();
    }
}

async fn seeded_layer() -> (TempDir, SemanticLayer) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("ncaa_basketball.db");
    seed_database(&db_path).await;
    (dir, SemanticLayer::new(db_path))
}

#[tokio::test]
async fn test_top_scorer_round_trip() {
    let (_dir, layer) = seeded_layer().await;

    let matched = layer.match_pattern("Who was the top scorer?").unwrap();
    assert_eq!(matched.rule.name, "top_scorer_game");

    let result = layer.ask("Who was the top scorer?", GAME_ID).await.unwrap();
    assert_eq!(result.pattern_name, "top_scorer_game");
    assert_eq!(
        result.answer,
        "Graham Ike led all scorers with 24 points (Gonzaga Bulldogs)"
    );
    assert!(result.sql_query.contains("ORDER BY points DESC"));
    assert!((0.70..=0.95).contains(&result.confidence));
}

#[tokio::test]
async fn test_final_score_round_trip() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer
        .ask("What was the final score?", GAME_ID)
        .await
        .unwrap();
    assert_eq!(result.pattern_name, "final_score");
    assert_eq!(result.answer, "Gonzaga Bulldogs 78 - Duke Blue Devils 72");
}

#[tokio::test]
async fn test_team_alias_resolves_before_substitution() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer
        .ask("How many turnovers did the Zags commit?", GAME_ID)
        .await
        .unwrap();
    assert_eq!(result.pattern_name, "team_turnovers");
    // "Zags" became the canonical key before SQL substitution
    assert!(result.sql_query.contains("'%gonzaga%'"), "{}", result.sql_query);
    assert_eq!(result.answer, "Gonzaga Bulldogs committed 6 turnovers");
}

#[tokio::test]
async fn test_team_points_from_games_table() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer
        .ask("How many points did Duke score?", GAME_ID)
        .await
        .unwrap();
    assert_eq!(result.pattern_name, "team_total_points");
    assert_eq!(result.answer, "Duke Blue Devils scored 72 points");
}

#[tokio::test]
async fn test_comparative_rule_formats_both_rows() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer.ask("Which team shot better?", GAME_ID).await.unwrap();
    assert_eq!(result.pattern_name, "better_shooting");
    // Two grouped rows, best percentage first, joined with "; "
    assert!(
        result
            .answer
            .starts_with("Gonzaga Bulldogs shot better at 48.8% (20-41)"),
        "{}",
        result.answer
    );
    assert!(result.answer.contains("; "));
    assert!(result.answer.contains("Duke Blue Devils"));
}

#[tokio::test]
async fn test_multi_row_answer_caps_at_five() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer
        .ask("Did anyone get a double double?", CROWDED_GAME_ID)
        .await
        .unwrap();
    assert_eq!(result.pattern_name, "double_double");
    assert_eq!(result.answer.matches("; ").count(), 4);
    assert!(result.answer.ends_with("(and 2 more)"), "{}", result.answer);
}

#[tokio::test]
async fn test_empty_result_is_low_confidence_not_error() {
    let (_dir, layer) = seeded_layer().await;

    let result = layer
        .ask("Who was the top scorer?", "no_such_game")
        .await
        .unwrap();
    assert_eq!(result.answer, NO_DATA_MESSAGE);
    assert_eq!(result.confidence, 0.3);
}

#[tokio::test]
async fn test_execution_failure_is_query_error() {
    // A database with no players table makes every player rule fail at
    // execution time.
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("empty.db");
    let mut conn = open_writable(&db_path).await;
    sqlx::query("CREATE TABLE games (game_id TEXT)")
        .execute(&mut conn)
        .await
        .unwrap();
    drop(conn);

    let layer = SemanticLayer::new(&db_path);
    let result = layer.ask("Who was the top scorer?", GAME_ID).await.unwrap();
    assert!(result.answer.starts_with("Query error:"), "{}", result.answer);
    assert_eq!(result.confidence, 0.0);
    assert!(!result.sql_query.is_empty());
}

#[tokio::test]
async fn test_no_match_returns_none() {
    let (_dir, layer) = seeded_layer().await;
    assert!(layer
        .ask("What is the airspeed of an unladen swallow?", GAME_ID)
        .await
        .is_none());
}

static MISMATCHED_RULE: Rule = Rule {
    name: "mismatched_slots",
    description: "format template names a column the SQL never produces",
    category: "test",
    triggers: &[r"nonsense"],
    sql_template: "SELECT player_name, points FROM players WHERE game_id = '{game_id}' ORDER BY points DESC LIMIT 1",
    format_template: "{player_name} recorded {gibberish} widgets",
    min_confidence: 0.9,
    requires_game_context: true,
};

#[tokio::test]
async fn test_unknown_format_slot_degrades_to_raw_row() {
    let dir = TempDir::new().unwrap();
    let db_path: PathBuf = dir.path().join("ncaa_basketball.db");
    seed_database(&db_path).await;

    let result = executor::execute(
        &MISMATCHED_RULE,
        &MatchParams::default(),
        GAME_ID,
        &db_path,
        0.9,
    )
    .await;

    assert!(result.answer.starts_with("Result: {"), "{}", result.answer);
    assert!(result.answer.contains("player_name: Graham Ike"));
    assert_eq!(result.confidence, 0.9);
}
