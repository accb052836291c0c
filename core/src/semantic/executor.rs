//! Templated SQL execution and answer formatting for the semantic layer.
//!
//! SQL is built by plain named-slot substitution, not bind parameters. The
//! game id and any extracted team/player values flow straight into the SQL
//! text. That is a deliberate, documented trust boundary (local read-only
//! demo database), kept so that question-matching behavior stays identical to
//! the pattern catalog's authoring assumptions. Do not add sanitization here
//! without revisiting the catalog.

use std::path::Path;

use regex::Regex;
use tracing::{debug, error};

use crate::db;

use super::catalog::Rule;
use super::matcher::MatchParams;

/// Answer returned when a query runs but matches nothing.
pub const NO_DATA_MESSAGE: &str = "No data found matching your question";

/// Confidence reported for an empty (but successful) result set: low enough
/// to signal "found nothing", distinct from the 0.0 of a hard failure.
const EMPTY_RESULT_CONFIDENCE: f64 = 0.3;

/// How many rows a multi-row answer spells out before summarizing the rest.
const MAX_FORMATTED_ROWS: usize = 5;

/// A fully formatted semantic-layer answer.
#[derive(Debug, Clone)]
pub struct SemanticAnswer {
    pub answer: String,
    pub sql_query: String,
    pub confidence: f64,
    pub pattern_name: String,
}

/// Substitute named `{slot}` values into a template.
///
/// Slots with no supplied value are left in place; SQLite then rejects the
/// statement and the error surfaces through the normal query-error path.
pub(crate) fn render_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in slots {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}

/// Format one row through the rule's answer template, degrading to a raw row
/// dump when the template names a column the result set lacks.
pub(crate) fn format_row(rule: &Rule, pairs: &[(String, String)]) -> String {
    let Ok(slot_re) = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return raw_row(pairs);
    };

    for caps in slot_re.captures_iter(rule.format_template) {
        let slot = &caps[1];
        if !pairs.iter().any(|(name, _)| name == slot) {
            debug!(
                "Rule {} format slot {{{}}} missing from result columns, using raw row",
                rule.name, slot
            );
            return raw_row(pairs);
        }
    }

    let slots: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    render_slots(rule.format_template, &slots)
}

fn raw_row(pairs: &[(String, String)]) -> String {
    let body = pairs
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Result: {{{}}}", body)
}

/// Execute a matched rule against the data store and format the result.
///
/// Total: every failure mode comes back as a `SemanticAnswer`, never an
/// error. The SQL text is always reported so callers can show what ran.
pub async fn execute(
    rule: &'static Rule,
    params: &MatchParams,
    game_id: &str,
    db_path: &Path,
    confidence: f64,
) -> SemanticAnswer {
    let mut slots: Vec<(&str, &str)> = vec![("game_id", game_id)];
    if let Some(team) = params.team {
        slots.push(("team", team));
    }
    if let Some(player) = params.player.as_deref() {
        slots.push(("player", player));
    }

    let sql = render_slots(rule.sql_template, &slots);
    let sql_reported = sql.trim().to_string();

    match db::fetch_all_pairs(db_path, &sql).await {
        Ok(rows) if rows.is_empty() => SemanticAnswer {
            answer: NO_DATA_MESSAGE.to_string(),
            sql_query: sql_reported,
            confidence: EMPTY_RESULT_CONFIDENCE,
            pattern_name: rule.name.to_string(),
        },
        Ok(rows) if rows.len() == 1 => SemanticAnswer {
            answer: format_row(rule, &rows[0]),
            sql_query: sql_reported,
            confidence,
            pattern_name: rule.name.to_string(),
        },
        Ok(rows) => {
            let mut answer = rows
                .iter()
                .take(MAX_FORMATTED_ROWS)
                .map(|row| format_row(rule, row))
                .collect::<Vec<_>>()
                .join("; ");
            if rows.len() > MAX_FORMATTED_ROWS {
                answer.push_str(&format!(" (and {} more)", rows.len() - MAX_FORMATTED_ROWS));
            }
            SemanticAnswer {
                answer,
                sql_query: sql_reported,
                confidence,
                pattern_name: rule.name.to_string(),
            }
        }
        Err(e) => {
            error!("Query failed for rule {}: {:#}", rule.name, e);
            SemanticAnswer {
                answer: format!("Query error: {:#}", e),
                sql_query: sql_reported,
                confidence: 0.0,
                pattern_name: rule.name.to_string(),
            }
        }
    }
}
