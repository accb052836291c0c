//! Analyst agent: asks the model to synthesize SQL against the known schema,
//! executes it verbatim, and formats the results generically.
//!
//! The model-produced statement runs unsanitized on the read-only store,
//! the second deliberate trust boundary in this crate (see the executor
//! module for the first). A successful answer is asserted at a fixed 0.9
//! confidence; this engine does not verify its own SQL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sqlx::Row;
use tracing::{debug, warn};

use crate::clients::AnthropicClient;
use crate::db;

/// Confidence for a formatted answer built from model-generated SQL.
const SYNTHESIS_CONFIDENCE: f64 = 0.9;

/// Confidence when the generated SQL ran but returned nothing.
const EMPTY_RESULT_CONFIDENCE: f64 = 0.5;

/// Result from the analyst agent.
#[derive(Debug, Clone)]
pub struct AnalystResult {
    pub answer: Option<String>,
    pub confidence: f64,
    pub sql_query: Option<String>,
    pub error: Option<String>,
}

/// Agent that generates and executes SQL via the language model.
#[derive(Debug, Clone)]
pub struct AnalystAgent {
    anthropic: AnthropicClient,
    db_path: PathBuf,
}

impl AnalystAgent {
    pub fn new(anthropic: AnthropicClient, db_path: impl Into<PathBuf>) -> Self {
        Self {
            anthropic,
            db_path: db_path.into(),
        }
    }

    /// Answer a question by generating and executing SQL.
    ///
    /// Total: every failure mode is folded into the returned `AnalystResult`.
    pub async fn ask(&self, question: &str, game_id: &str) -> AnalystResult {
        let prompt = match self.build_prompt(question, game_id).await {
            Ok(prompt) => prompt,
            Err(e) => {
                return AnalystResult {
                    answer: None,
                    confidence: 0.0,
                    sql_query: None,
                    error: Some(format!("Analyst agent error: {:#}", e)),
                }
            }
        };

        let response_text = match self.anthropic.complete(None, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("SQL synthesis call failed: {}", e);
                return AnalystResult {
                    answer: None,
                    confidence: 0.0,
                    sql_query: None,
                    error: Some(format!("Analyst agent error: {}", e)),
                };
            }
        };

        let Some(sql_query) = extract_sql(&response_text) else {
            return AnalystResult {
                answer: None,
                confidence: 0.0,
                sql_query: None,
                error: Some("Could not generate SQL query".to_string()),
            };
        };
        debug!("Synthesized SQL: {}", sql_query);

        match db::fetch_all_pairs(&self.db_path, &sql_query).await {
            Err(e) => AnalystResult {
                answer: None,
                confidence: 0.0,
                sql_query: Some(sql_query),
                error: Some(format!("SQL execution error: {:#}", e)),
            },
            Ok(rows) if rows.is_empty() => AnalystResult {
                answer: Some("No data found for this query".to_string()),
                confidence: EMPTY_RESULT_CONFIDENCE,
                sql_query: Some(sql_query),
                error: None,
            },
            Ok(rows) => AnalystResult {
                answer: Some(format_answer(&rows)),
                confidence: SYNTHESIS_CONFIDENCE,
                sql_query: Some(sql_query),
                error: None,
            },
        }
    }

    async fn build_prompt(&self, question: &str, game_id: &str) -> Result<String> {
        let schema = self.schema().await?;
        let sample = self.sample_data(game_id).await?;

        Ok(format!(
            "You are a SQL expert analyzing NCAA basketball game data.

DATABASE SCHEMA:
{schema}

CURRENT GAME CONTEXT:
{sample}
Game ID: {game_id}

USER QUESTION: {question}

Generate a SQL query to answer this question. Important rules:
1. Always filter by game_id = '{game_id}'
2. Team names may be partial matches - use LIKE '%team%' for flexibility
3. For \"2nd most\" or ordinal queries, use LIMIT with OFFSET or ROW_NUMBER
4. Common abbreviations: ALA=Alabama, TEX=Texas, DUKE=Duke, UNC=North Carolina, etc.

Respond in this exact format:
SQL: <your sql query here>
EXPLANATION: <brief explanation of what the query does>"
        ))
    }

    /// Literal column schema of every real table, for prompt grounding.
    async fn schema(&self) -> Result<String> {
        let mut conn = db::open_readonly(&self.db_path).await?;

        let tables = sqlx::query("SELECT name FROM sqlite_master WHERE type='table'")
            .fetch_all(&mut conn)
            .await
            .context("Failed to list tables")?;

        let mut schema_parts = Vec::new();
        for table_row in tables {
            let table: String = table_row.try_get("name")?;
            if table.starts_with("sqlite") {
                continue;
            }

            let columns = sqlx::query(&format!("PRAGMA table_info({})", table))
                .fetch_all(&mut conn)
                .await
                .with_context(|| format!("Failed to describe table {}", table))?;

            let mut col_defs = Vec::new();
            for col in columns {
                let name: String = col.try_get("name")?;
                let col_type: String = col.try_get("type")?;
                col_defs.push(format!("  {} {}", name, col_type));
            }
            schema_parts.push(format!("{}:\n{}", table, col_defs.join("\n")));
        }

        Ok(schema_parts.join("\n\n"))
    }

    /// A few rows from the selected game so the model sees real team and
    /// player spellings.
    async fn sample_data(&self, game_id: &str) -> Result<String> {
        let mut conn = db::open_readonly(&self.db_path).await?;

        let game = sqlx::query(
            r#"
            SELECT away_team_name, away_team_abbrev, away_team_score,
                   home_team_name, home_team_abbrev, home_team_score
            FROM games WHERE game_id = ?
            "#,
        )
        .bind(game_id)
        .fetch_optional(&mut conn)
        .await?;

        let game_line = match game {
            Some(row) => format!(
                "Game: {} ({}) {} vs {} ({}) {}",
                row.try_get::<String, _>("away_team_name")?,
                row.try_get::<String, _>("away_team_abbrev")?,
                row.try_get::<i64, _>("away_team_score")?,
                row.try_get::<String, _>("home_team_name")?,
                row.try_get::<String, _>("home_team_abbrev")?,
                row.try_get::<i64, _>("home_team_score")?,
            ),
            None => format!("Game: no record for id {}", game_id),
        };

        let team_rows = sqlx::query("SELECT DISTINCT team_name FROM players WHERE game_id = ?")
            .bind(game_id)
            .fetch_all(&mut conn)
            .await?;
        let mut teams = Vec::new();
        for row in team_rows {
            teams.push(row.try_get::<String, _>("team_name")?);
        }

        let player_rows = sqlx::query(
            r#"
            SELECT player_name, team_name, points, rebounds, assists
            FROM players WHERE game_id = ? LIMIT 5
            "#,
        )
        .bind(game_id)
        .fetch_all(&mut conn)
        .await?;
        let mut players = Vec::new();
        for row in player_rows.iter().take(3) {
            players.push(format!(
                "{} ({}): {} pts, {} reb, {} ast",
                row.try_get::<String, _>("player_name")?,
                row.try_get::<String, _>("team_name")?,
                row.try_get::<i64, _>("points")?,
                row.try_get::<i64, _>("rebounds")?,
                row.try_get::<i64, _>("assists")?,
            ));
        }

        Ok(format!(
            "{}\nTeams in data: {}\nSample players: {}",
            game_line,
            teams.join(", "),
            players.join("; ")
        ))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Pull the SQL statement out of the model's reply.
///
/// Collects everything from the `SQL:` marker up to (not including) the
/// `EXPLANATION:` marker or end of text, joins the lines with spaces, and
/// strips code-fence markers.
fn extract_sql(response: &str) -> Option<String> {
    let mut sql_lines: Vec<String> = Vec::new();
    let mut in_sql = false;

    for line in response.lines() {
        let upper = line.trim().to_uppercase();
        if upper.starts_with("SQL:") {
            in_sql = true;
            if let Some(content) = line.splitn(2, ':').nth(1) {
                let content = content.trim();
                if !content.is_empty() {
                    sql_lines.push(content.to_string());
                }
            }
        } else if in_sql {
            if upper.starts_with("EXPLANATION:") {
                break;
            }
            sql_lines.push(line.to_string());
        }
    }

    let sql = sql_lines
        .join(" ")
        .replace("```sql", "")
        .replace("```", "")
        .trim()
        .to_string();

    if sql.is_empty() {
        None
    } else {
        Some(sql)
    }
}

/// Column-driven formatting for arbitrary result shapes.
///
/// One row with two or more columns reads as "first-value - value col -
/// value col"; anything else lists up to five "first: second" lines.
fn format_answer(rows: &[Vec<(String, String)>]) -> String {
    if rows.is_empty() {
        return "No results found".to_string();
    }

    if rows.len() == 1 && rows[0].len() >= 2 {
        let row = &rows[0];
        let mut parts = vec![row[0].1.clone()];
        for (col, value) in &row[1..] {
            parts.push(format!("{} {}", value, col));
        }
        return parts.join(" - ");
    }

    rows.iter()
        .take(5)
        .map(|row| {
            let first = row.first().map(|(_, v)| v.as_str()).unwrap_or("");
            let second = row.get(1).map(|(_, v)| v.as_str()).unwrap_or("");
            format!("{}: {}", first, second)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_sql_single_line() {
        let response = "SQL: SELECT * FROM players\nEXPLANATION: selects everything";
        assert_eq!(
            extract_sql(response).unwrap(),
            "SELECT * FROM players"
        );
    }

    #[test]
    fn test_extract_sql_multiline_stops_at_explanation() {
        let response = "SQL: SELECT player_name, points\nFROM players\nWHERE game_id = '401'\nEXPLANATION: top scorer query\nmore prose";
        assert_eq!(
            extract_sql(response).unwrap(),
            "SELECT player_name, points FROM players WHERE game_id = '401'"
        );
    }

    #[test]
    fn test_extract_sql_strips_code_fences() {
        let response = "SQL: ```sql\nSELECT COUNT(*) FROM games\n```\nEXPLANATION: counts games";
        assert_eq!(extract_sql(response).unwrap(), "SELECT COUNT(*) FROM games");
    }

    #[test]
    fn test_extract_sql_runs_to_end_without_marker() {
        let response = "SQL: SELECT points\nFROM players";
        assert_eq!(extract_sql(response).unwrap(), "SELECT points FROM players");
    }

    #[test]
    fn test_extract_sql_absent() {
        assert!(extract_sql("I cannot answer that question.").is_none());
        assert!(extract_sql("").is_none());
    }

    #[test]
    fn test_format_answer_single_row() {
        let rows = vec![pairs(&[
            ("player_name", "Jalen Smith"),
            ("points", "24"),
            ("rebounds", "9"),
        ])];
        assert_eq!(format_answer(&rows), "Jalen Smith - 24 points - 9 rebounds");
    }

    #[test]
    fn test_format_answer_multiple_rows_capped_at_five() {
        let rows: Vec<_> = (0..7)
            .map(|i| pairs(&[("player_name", &format!("Player {}", i)[..]), ("points", "10")]))
            .collect();
        let answer = format_answer(&rows);
        assert_eq!(answer.matches(';').count(), 4);
        assert!(answer.starts_with("Player 0: 10"));
        assert!(!answer.contains("Player 5"));
    }

    #[test]
    fn test_format_answer_single_column_row() {
        // One row with one column takes the listing branch, not the dash join.
        let rows = vec![pairs(&[("total", "42")])];
        assert_eq!(format_answer(&rows), "42: ");
    }

    #[test]
    fn test_format_answer_empty() {
        assert_eq!(format_answer(&[]), "No results found");
    }
}
