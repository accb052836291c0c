// Shared models for the Courtvision comparison core
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Engine Selection
// ============================================================================

/// Which SQL answer path the harness dispatches alongside the vision agent.
///
/// `Semantic` tries the hand-authored pattern catalog first and falls through
/// to model-synthesized SQL when no pattern fires. `Synthesis` always asks the
/// model for SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlEngine {
    Semantic,
    Synthesis,
}

// ============================================================================
// Game Context
// ============================================================================

/// A finished game eligible for questioning: database record plus an existing
/// boxscore screenshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: String,
    pub away_team: String,
    pub away_abbrev: String,
    pub away_score: i64,
    pub home_team: String,
    pub home_abbrev: String,
    pub home_score: i64,
    pub status: String,
    pub game_date: String,
    pub screenshot_path: PathBuf,
}

// ============================================================================
// Agent Output Contract
// ============================================================================

/// Result from one answer engine for one question.
///
/// `error` and `answer` are mutually informative: when `error` is set the
/// answer (if any) is not authoritative. Confidence is always in [0.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub answer: Option<String>,
    pub confidence: f64,
    pub time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
}

impl AgentResult {
    /// A failed run: no authoritative answer, zero confidence.
    pub fn failure(error: impl Into<String>, time_ms: u64) -> Self {
        Self {
            answer: None,
            confidence: 0.0,
            time_ms,
            error: Some(error.into()),
            sql_query: None,
            pattern_name: None,
            screenshot_path: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shape() {
        let result = AgentResult::failure("model call failed", 120);
        assert!(result.is_error());
        assert!(result.answer.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.time_ms, 120);
    }

    #[test]
    fn test_sql_engine_serde() {
        let json = serde_json::to_string(&SqlEngine::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
        let engine: SqlEngine = serde_json::from_str("\"synthesis\"").unwrap();
        assert_eq!(engine, SqlEngine::Synthesis);
    }
}
