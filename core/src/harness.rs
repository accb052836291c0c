//! Comparison harness: both answer engines, one question, side by side.
//!
//! The vision path and the SQL path are dispatched as two independent tokio
//! tasks with no shared state: each opens its own database connection and
//! makes its own model call. Every entry point here is a total function from
//! question to `AgentResult`; a failure in one path never suppresses or
//! alters the other's result. Once dispatched, both paths run to completion;
//! there is no cancellation or timeout at this layer.

use std::time::Instant;

use tracing::{debug, info};

use crate::agents::{AnalystAgent, VisionAgent};
use crate::clients::AnthropicClient;
use crate::config::Config;
use crate::models::{AgentResult, GameInfo, SqlEngine};
use crate::semantic::SemanticLayer;

/// Both engines' results for one question against one game.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub vision: AgentResult,
    pub sql: AgentResult,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Run the vision engine for one question, timing from dispatch to
/// completion. Never returns an error; failures come back in the result.
pub async fn run_vision_agent(question: &str, game: &GameInfo, config: &Config) -> AgentResult {
    let start = Instant::now();

    let client = match AnthropicClient::from_config(config) {
        Ok(client) => client,
        Err(e) => return AgentResult::failure(e.to_string(), elapsed_ms(start)),
    };

    let agent = VisionAgent::new(client);
    let result = agent.ask(question, Some(&game.screenshot_path)).await;

    AgentResult {
        // Only surface the screenshot when there is an answer to back up
        screenshot_path: if result.answer.is_some() {
            result.screenshot_path
        } else {
            None
        },
        answer: result.answer,
        confidence: result.confidence,
        time_ms: elapsed_ms(start),
        error: result.error,
        sql_query: None,
        pattern_name: None,
    }
}

/// Run the SQL engine for one question, timing from dispatch to completion.
///
/// With `SqlEngine::Semantic` the pattern catalog answers when a rule fires;
/// a no-match is a defer signal and the question falls through to SQL
/// synthesis. `SqlEngine::Synthesis` skips the catalog entirely.
pub async fn run_sql_agent(
    question: &str,
    game_id: &str,
    config: &Config,
    engine: SqlEngine,
) -> AgentResult {
    let start = Instant::now();

    if engine == SqlEngine::Semantic {
        let layer = SemanticLayer::new(&config.db_path);
        if let Some(result) = layer.ask(question, game_id).await {
            info!(
                "Semantic layer answered via {} at {:.2}",
                result.pattern_name, result.confidence
            );
            return AgentResult {
                answer: Some(result.answer),
                confidence: result.confidence,
                time_ms: elapsed_ms(start),
                error: None,
                sql_query: Some(result.sql_query),
                pattern_name: Some(result.pattern_name),
                screenshot_path: None,
            };
        }
        debug!("No semantic pattern matched, deferring to SQL synthesis");
    }

    let client = match AnthropicClient::from_config(config) {
        Ok(client) => client,
        Err(e) => return AgentResult::failure(e.to_string(), elapsed_ms(start)),
    };

    let agent = AnalystAgent::new(client, config.db_path.clone());
    let result = agent.ask(question, game_id).await;

    AgentResult {
        answer: result.answer,
        confidence: result.confidence,
        time_ms: elapsed_ms(start),
        error: result.error,
        sql_query: result.sql_query,
        pattern_name: None,
        screenshot_path: None,
    }
}

/// Run both engines concurrently for one question against one game.
///
/// The caller gets both results once both paths finish; partial results are
/// not streamed. A panicked task is folded into an error result so the other
/// path's outcome still renders.
pub async fn compare(
    question: &str,
    game: &GameInfo,
    config: &Config,
    engine: SqlEngine,
) -> Comparison {
    let start = Instant::now();

    let vision_task = {
        let question = question.to_string();
        let game = game.clone();
        let config = config.clone();
        tokio::spawn(async move { run_vision_agent(&question, &game, &config).await })
    };

    let sql_task = {
        let question = question.to_string();
        let game_id = game.game_id.clone();
        let config = config.clone();
        tokio::spawn(async move { run_sql_agent(&question, &game_id, &config, engine).await })
    };

    let (vision, sql) = tokio::join!(vision_task, sql_task);

    Comparison {
        vision: vision.unwrap_or_else(|e| {
            AgentResult::failure(format!("Vision task failed: {}", e), elapsed_ms(start))
        }),
        sql: sql.unwrap_or_else(|e| {
            AgentResult::failure(format!("SQL task failed: {}", e), elapsed_ms(start))
        }),
    }
}
