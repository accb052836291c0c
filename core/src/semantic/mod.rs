//! The pattern-matching semantic layer: hand-authored question patterns
//! mapped to templated SQL with confidence scoring.
//!
//! Matching and execution are exposed separately (`match_pattern`,
//! `executor::execute`) so front ends can inspect which rule fired and what
//! SQL ran; `ask` is the one-shot composition of the two.

pub mod aliases;
pub mod catalog;
pub mod executor;
pub mod matcher;

use std::path::PathBuf;

pub use catalog::{Rule, PATTERNS};
pub use executor::{SemanticAnswer, NO_DATA_MESSAGE};
pub use matcher::{MatchParams, PatternMatch};

/// The semantic layer bound to a data store and a rule catalog.
#[derive(Debug, Clone)]
pub struct SemanticLayer {
    db_path: PathBuf,
    patterns: &'static [Rule],
}

impl SemanticLayer {
    /// Layer over the default catalog.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_patterns(db_path, PATTERNS)
    }

    /// Layer over a custom catalog (exercised by tests and experiments).
    pub fn with_patterns(db_path: impl Into<PathBuf>, patterns: &'static [Rule]) -> Self {
        Self {
            db_path: db_path.into(),
            patterns,
        }
    }

    /// Find the best matching rule for a question, with extracted parameters
    /// and confidence. `None` means no trigger in the catalog fired.
    pub fn match_pattern(&self, question: &str) -> Option<PatternMatch> {
        matcher::match_pattern(self.patterns, question)
    }

    /// Answer a question through the pattern catalog.
    ///
    /// Returns `None` when no pattern matches (callers typically defer to the
    /// SQL-synthesis engine); otherwise always returns an answer, even when
    /// the query itself fails, in which case the failure text is the answer.
    pub async fn ask(&self, question: &str, game_id: &str) -> Option<SemanticAnswer> {
        let matched = self.match_pattern(question)?;
        Some(
            executor::execute(
                matched.rule,
                &matched.params,
                game_id,
                &self.db_path,
                matched.confidence,
            )
            .await,
        )
    }
}
