//! Configuration and environment loading for the comparison core.
//!
//! This module manages all runtime configuration:
//! - Data store and screenshot locations
//! - Anthropic API credential and model selection
//! - Tracing subscriber installation for host applications

use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

/// Default SQLite database file, relative to the base directory
pub const DEFAULT_DB_FILE: &str = "ncaa_basketball.db";

/// Default directory holding boxscore screenshots, relative to the base directory
pub const DEFAULT_SCREENSHOTS_DIR: &str = "screenshots";

/// Canned questions surfaced by front ends as one-click prompts
pub const QUICK_QUESTIONS: &[&str] = &[
    "Who was the top scorer?",
    "What was the final score?",
    "Who had the most rebounds?",
    "Who made the most 3-pointers?",
];

/// Runtime configuration shared by both answer engines
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory that relative database/screenshot paths resolve against
    pub base_dir: PathBuf,
    /// SQLite database file with games, players, and screenshots tables
    pub db_path: PathBuf,
    /// Directory holding boxscore screenshots
    pub screenshots_dir: PathBuf,
    /// Anthropic API key; engines that need it fail fast when absent
    pub api_key: Option<String>,
    /// Model used for both vision and SQL-synthesis calls
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        dotenv().ok();

        let base_dir = env::var("COURTVISION_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let db_path = env::var("COURTVISION_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join(DEFAULT_DB_FILE));

        let screenshots_dir = env::var("COURTVISION_SCREENSHOTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join(DEFAULT_SCREENSHOTS_DIR));

        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| crate::clients::anthropic::DEFAULT_MODEL.to_string());

        Self {
            base_dir,
            db_path,
            screenshots_dir,
            api_key,
            model,
        }
    }

    /// Build a configuration rooted at a specific directory (no environment reads)
    pub fn for_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            db_path: base_dir.join(DEFAULT_DB_FILE),
            screenshots_dir: base_dir.join(DEFAULT_SCREENSHOTS_DIR),
            api_key: None,
            model: crate::clients::anthropic::DEFAULT_MODEL.to_string(),
            base_dir,
        }
    }
}

/// Install the global tracing subscriber. Hosts call this once at startup;
/// repeated calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}
