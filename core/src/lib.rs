//! Courtvision Core - visual-context vs text-to-SQL comparison for basketball boxscores.
//!
//! This crate provides:
//! - A pattern-matching semantic layer (hand-authored question patterns → templated SQL)
//! - Team/player alias resolution for parameter extraction
//! - A vision agent that answers questions from a boxscore screenshot
//! - An analyst agent that asks a language model to synthesize SQL against the schema
//! - A comparison harness that runs both answer paths concurrently per question
//!
//! The UI layer (game selection, rendering, session state) lives outside this crate;
//! everything here is exposed as plain async functions and value types.

pub mod agents;
pub mod clients;
pub mod config;
pub mod db;
pub mod harness;
pub mod models;
pub mod semantic;

pub use config::Config;
pub use harness::{compare, run_sql_agent, run_vision_agent, Comparison};
pub use models::{AgentResult, GameInfo, SqlEngine};
pub use semantic::SemanticLayer;
