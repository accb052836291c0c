//! Linear-scan pattern matching over the rule catalog.
//!
//! Every trigger of every rule is tested against the lowercased question and
//! scored by how much of the question the match explains. Only the single
//! best-scoring (rule, trigger) survives; ties keep the first-seen rule, so
//! catalog order doubles as the tie-break policy.

use regex::Regex;
use tracing::{debug, warn};

use super::aliases;
use super::catalog::Rule;

/// Parameters extracted from the question for SQL template substitution.
#[derive(Debug, Clone, Default)]
pub struct MatchParams {
    pub team: Option<&'static str>,
    pub player: Option<String>,
}

/// A winning rule with its extracted parameters and match confidence.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub rule: &'static Rule,
    pub params: MatchParams,
    pub confidence: f64,
}

/// Score one trigger hit: 0.70 base plus up to 0.25 for question coverage,
/// capped below full certainty.
fn trigger_score(matched_chars: usize, question_chars: usize) -> f64 {
    let coverage = matched_chars as f64 / question_chars as f64;
    (0.70 + 0.25 * coverage).min(0.95)
}

/// Find the best matching rule for a question, or `None` when no trigger in
/// the whole catalog fires. A `None` is a defer-to-alternate-engine signal,
/// not an error.
pub fn match_pattern(patterns: &'static [Rule], question: &str) -> Option<PatternMatch> {
    let question_lower = question.trim().to_lowercase();
    let question_chars = question_lower.chars().count();
    if question_chars == 0 {
        return None;
    }

    let mut best: Option<(&'static Rule, f64)> = None;

    for rule in patterns {
        for trigger in rule.triggers {
            let Ok(re) = Regex::new(trigger) else {
                warn!("Unusable trigger on rule {}: {}", rule.name, trigger);
                continue;
            };
            let Some(hit) = re.find(&question_lower) else {
                continue;
            };

            let score = trigger_score(hit.as_str().chars().count(), question_chars);
            // Strictly-greater comparison: first-seen wins ties.
            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if improves {
                best = Some((rule, score));
            }
        }
    }

    let (rule, confidence) = best?;

    // Extraction runs against the raw question, independent of which rule won:
    // any rule may receive team/player params even if its SQL ignores them.
    let params = MatchParams {
        team: aliases::resolve_team(question),
        player: aliases::resolve_player(question),
    };

    debug!(
        "Matched rule {} (category {}) at confidence {:.2}",
        rule.name, rule.category, confidence
    );

    Some(PatternMatch {
        rule,
        params,
        confidence,
    })
}
