//! Team and player name resolution for question parameter extraction.
//!
//! Teams are resolved against a fixed alias table mapping each canonical
//! school key to the surface forms fans actually type (nicknames, mascots,
//! abbreviations). Resolution is whole-word and case-insensitive, and the
//! first table entry with a hit wins: overlapping nicknames (several schools
//! are "wildcats") resolve by table order, not specificity. Callers that need
//! finer disambiguation should put the full school name in the question.

use regex::Regex;
use tracing::warn;

/// Canonical school key → accepted surface forms, in resolution order.
pub const TEAM_ALIASES: &[(&str, &[&str])] = &[
    // ACC
    ("duke", &["duke", "blue devils"]),
    ("wake forest", &["wake", "wake forest", "demon deacons"]),
    ("north carolina", &["unc", "carolina", "tar heels", "north carolina"]),
    ("virginia", &["uva", "virginia", "cavaliers", "wahoos"]),
    ("nc state", &["nc state", "wolfpack", "north carolina state"]),
    ("clemson", &["clemson", "tigers"]),
    ("louisville", &["louisville", "cardinals"]),
    ("syracuse", &["syracuse", "orange"]),
    ("pittsburgh", &["pitt", "pittsburgh", "panthers"]),
    ("boston college", &["bc", "boston college", "eagles"]),
    ("miami", &["miami", "hurricanes"]),
    ("georgia tech", &["georgia tech", "gt", "yellow jackets"]),
    ("notre dame", &["notre dame", "irish", "fighting irish"]),
    ("florida state", &["florida state", "fsu", "seminoles"]),
    // Big 12
    ("texas", &["texas", "longhorns", "ut"]),
    ("byu", &["byu", "cougars", "brigham young"]),
    ("utah", &["utah", "utes"]),
    ("colorado", &["colorado", "buffaloes", "buffs", "cu"]),
    ("arizona", &["arizona", "wildcats", "zona"]),
    ("arizona state", &["arizona state", "asu", "sun devils"]),
    ("tcu", &["tcu", "horned frogs"]),
    ("baylor", &["baylor", "bears"]),
    ("kansas", &["kansas", "jayhawks", "ku"]),
    ("kansas state", &["kansas state", "k-state", "wildcats"]),
    ("oklahoma state", &["oklahoma state", "okst", "cowboys"]),
    ("iowa state", &["iowa state", "isu", "cyclones"]),
    ("west virginia", &["west virginia", "wvu", "mountaineers"]),
    ("texas tech", &["texas tech", "ttu", "red raiders"]),
    ("cincinnati", &["cincinnati", "bearcats"]),
    ("houston", &["houston", "cougars", "uh"]),
    ("ucf", &["ucf", "knights", "central florida"]),
    // SEC
    ("alabama", &["alabama", "bama", "crimson tide"]),
    ("auburn", &["auburn", "tigers"]),
    ("arkansas", &["arkansas", "razorbacks", "hogs"]),
    ("tennessee", &["tennessee", "vols", "volunteers"]),
    ("kentucky", &["kentucky", "uk", "wildcats"]),
    ("florida", &["florida", "gators", "uf"]),
    ("georgia", &["georgia", "uga", "bulldogs"]),
    ("south carolina", &["south carolina", "gamecocks", "sc"]),
    ("lsu", &["lsu", "tigers", "louisiana state"]),
    ("mississippi state", &["mississippi state", "miss state", "bulldogs"]),
    ("ole miss", &["ole miss", "rebels", "mississippi"]),
    ("missouri", &["missouri", "mizzou", "tigers"]),
    ("vanderbilt", &["vanderbilt", "vandy", "commodores"]),
    ("texas a&m", &["texas a&m", "tamu", "aggies"]),
    // Big Ten
    ("purdue", &["purdue", "boilermakers"]),
    ("indiana", &["indiana", "hoosiers", "iu"]),
    ("michigan", &["michigan", "wolverines"]),
    ("michigan state", &["michigan state", "msu", "spartans"]),
    ("ohio state", &["ohio state", "osu", "buckeyes"]),
    ("illinois", &["illinois", "illini"]),
    ("iowa", &["iowa", "hawkeyes"]),
    ("wisconsin", &["wisconsin", "badgers"]),
    ("minnesota", &["minnesota", "gophers", "golden gophers"]),
    ("northwestern", &["northwestern", "wildcats"]),
    ("penn state", &["penn state", "psu", "nittany lions"]),
    ("maryland", &["maryland", "terrapins", "terps"]),
    ("nebraska", &["nebraska", "cornhuskers", "huskers"]),
    ("rutgers", &["rutgers", "scarlet knights"]),
    // Other notable
    ("gonzaga", &["gonzaga", "zags", "bulldogs"]),
    ("uconn", &["uconn", "connecticut", "huskies"]),
    ("villanova", &["villanova", "nova", "wildcats"]),
    ("creighton", &["creighton", "bluejays"]),
    ("marquette", &["marquette", "golden eagles"]),
    ("stanford", &["stanford", "cardinal"]),
    ("ucla", &["ucla", "bruins"]),
    ("usc", &["usc", "trojans", "southern cal"]),
    ("oregon", &["oregon", "ducks"]),
    ("smu", &["smu", "mustangs"]),
];

/// Syntactic shapes that carry a player name in stat questions.
const PLAYER_PATTERNS: &[&str] = &[
    r"(?:did|how many|what did)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s+(?:score|get|have)",
    r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)'s\s+(?:stats|points|rebounds|assists)",
    r"(?:stats|points|rebounds)\s+(?:for|of)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)",
];

/// Resolve a team mention in the question to its canonical key.
///
/// Whole-word occurrence check per alias ("utah" never hits inside
/// "utahan"); first table entry with any hit wins.
pub fn resolve_team(question: &str) -> Option<&'static str> {
    let question_lower = question.to_lowercase();

    for (canonical, surface_forms) in TEAM_ALIASES {
        for alias in *surface_forms {
            let pattern = format!(r"\b{}\b", regex::escape(alias));
            let Ok(re) = Regex::new(&pattern) else {
                warn!("Unusable alias pattern for {}: {}", canonical, alias);
                continue;
            };
            if re.is_match(&question_lower) {
                return Some(canonical);
            }
        }
    }

    None
}

/// Pull a capitalized one-or-two-word player name out of the question.
///
/// Purely syntactic: the first template that matches wins and the span is not
/// validated against any roster.
pub fn resolve_player(question: &str) -> Option<String> {
    for pattern in PLAYER_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            warn!("Unusable player pattern: {}", pattern);
            continue;
        };
        if let Some(caps) = re.captures(question) {
            if let Some(name) = caps.get(1) {
                return Some(name.as_str().to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_resolves() {
        assert_eq!(resolve_team("How many points did Duke score?"), Some("duke"));
    }

    #[test]
    fn test_nickname_resolves_to_canonical() {
        assert_eq!(resolve_team("Did the Zags win the rebounding battle?"), Some("gonzaga"));
        assert_eq!(resolve_team("How did Bama shoot from three?"), Some("alabama"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolve_team("UTAH total rebounds"), Some("utah"));
        assert_eq!(resolve_team("utah total rebounds"), Some("utah"));
    }

    #[test]
    fn test_whole_word_only() {
        assert_eq!(resolve_team("The Utahan crowd was loud"), None);
        assert_eq!(resolve_team("Greetings from Utahville"), None);
    }

    #[test]
    fn test_shared_nickname_resolves_by_table_order() {
        // Several schools are "wildcats"; the first table entry carrying the
        // alias (Arizona) wins.
        assert_eq!(resolve_team("How did the Wildcats shoot?"), Some("arizona"));
    }

    #[test]
    fn test_no_team_mention() {
        assert_eq!(resolve_team("Who had the most assists?"), None);
    }

    #[test]
    fn test_player_from_did_score_shape() {
        assert_eq!(
            resolve_player("How many points did Jalen Smith score?"),
            Some("Jalen Smith".to_string())
        );
    }

    #[test]
    fn test_player_from_possessive_shape() {
        assert_eq!(
            resolve_player("What were Cooper Flagg's stats?"),
            Some("Cooper Flagg".to_string())
        );
    }

    #[test]
    fn test_player_from_stats_for_shape() {
        assert_eq!(
            resolve_player("Show me the rebounds for Mark Sears"),
            Some("Mark Sears".to_string())
        );
    }

    #[test]
    fn test_player_single_word() {
        assert_eq!(
            resolve_player("How many rebounds did Edey have?"),
            Some("Edey".to_string())
        );
    }

    #[test]
    fn test_no_player_mention() {
        assert_eq!(resolve_player("who won the game"), None);
    }
}
