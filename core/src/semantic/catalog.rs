//! The hand-authored pattern catalog: question shapes → SQL templates.
//!
//! Each rule pairs trigger expressions (regex over the lowercased question)
//! with a SQL template and an answer format template. Coverage spans
//! individual player stats, team totals, and cross-team comparisons so the
//! semantic layer is a fair opponent for the vision agent. Catalog order
//! matters: the matcher breaks score ties in favor of the earlier rule.

/// One semantic query pattern.
///
/// `sql_template` always carries a `{game_id}` slot and may carry `{team}` /
/// `{player}` slots filled from alias resolution. `format_template` slots
/// must name columns the SQL can produce; when they do not, formatting falls
/// back to a raw row dump rather than failing the answer.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub triggers: &'static [&'static str],
    pub sql_template: &'static str,
    pub format_template: &'static str,
    pub min_confidence: f64,
    pub requires_game_context: bool,
}

/// The full catalog, scanned linearly by the matcher.
pub const PATTERNS: &[Rule] = &[
    // ------------------------------------------------------------------
    // Individual player stats
    // ------------------------------------------------------------------
    Rule {
        name: "top_scorer_game",
        description: "Find the top scorer in a game",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:top|leading|lead|most|highest).*scor",
            r"(?:top|leading|lead|highest).*scor",
            r"who scored (?:the )?most",
            r"leading scorer",
            r"lead scorer",
            r"most points",
            r"who (?:was|is) the (?:top|lead|best) scorer",
        ],
        sql_template: r#"
            SELECT player_name, points, team_name, rebounds, assists
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY points DESC
            LIMIT 1
        "#,
        format_template: "{player_name} led all scorers with {points} points ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "top_scorer_team",
        description: "Find the top scorer for a specific team",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:top|leading|lead|most).*scor.*(?:for|on)\s+\w+",
            r"(?:\w+)(?:'s)?\s+(?:top|leading|lead|best)\s+scorer",
            r"who led (\w+) in (?:points|scoring)",
            r"lead scorer (?:for|on) (\w+)",
            r"(?:top|lead|best) scorer (?:for|on) (\w+)",
            r"who (?:was|is) the lead scorer for (\w+)",
        ],
        sql_template: r#"
            SELECT player_name, points, team_name, rebounds, assists
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            ORDER BY points DESC
            LIMIT 1
        "#,
        format_template: "{player_name} led {team_name} with {points} points",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_rebounds_game",
        description: "Find player with most rebounds in game",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading|highest).*rebounds?",
            r"(?:most|leading).*rebounds?",
            r"rebound.*leader",
            r"who led.*rebounds",
        ],
        sql_template: r#"
            SELECT player_name, rebounds, team_name, offensive_rebounds, defensive_rebounds
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY rebounds DESC
            LIMIT 1
        "#,
        format_template: "{player_name} grabbed {rebounds} rebounds ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_rebounds_team",
        description: "Find player with most rebounds for a team",
        category: "individual",
        triggers: &[
            r"who led (\w+) in rebounds",
            r"(\w+)(?:'s)? (?:top|leading) rebounder",
            r"most rebounds (?:for|on) (\w+)",
        ],
        sql_template: r#"
            SELECT player_name, rebounds, team_name, offensive_rebounds, defensive_rebounds
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            ORDER BY rebounds DESC
            LIMIT 1
        "#,
        format_template: "{player_name} led {team_name} with {rebounds} rebounds",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_assists_game",
        description: "Find player with most assists in game",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading|highest).*assists?",
            r"(?:most|leading).*assists?",
            r"assist.*leader",
            r"who (?:led|had).*assists",
        ],
        sql_template: r#"
            SELECT player_name, assists, team_name, points
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY assists DESC
            LIMIT 1
        "#,
        format_template: "{player_name} dished out {assists} assists ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_assists_team",
        description: "Find player with most assists for a team",
        category: "individual",
        triggers: &[
            r"who led (\w+) in assists",
            r"(\w+)(?:'s)? assist leader",
            r"most assists (?:for|on) (\w+)",
        ],
        sql_template: r#"
            SELECT player_name, assists, team_name, points
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            ORDER BY assists DESC
            LIMIT 1
        "#,
        format_template: "{player_name} led {team_name} with {assists} assists",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_steals",
        description: "Find player with most steals",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading).*steals?",
            r"(?:most|leading).*steals?",
            r"steal.*leader",
        ],
        sql_template: r#"
            SELECT player_name, steals, team_name
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY steals DESC
            LIMIT 1
        "#,
        format_template: "{player_name} had {steals} steals ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_blocks",
        description: "Find player with most blocks",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading).*blocks?",
            r"(?:most|leading).*blocks?",
            r"block.*leader",
            r"who blocked.*most",
        ],
        sql_template: r#"
            SELECT player_name, blocks, team_name
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY blocks DESC
            LIMIT 1
        "#,
        format_template: "{player_name} had {blocks} blocks ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_turnovers",
        description: "Find player with most turnovers",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading).*turnovers?",
            r"(?:most|leading).*turnovers?",
            r"who turned.*over.*most",
        ],
        sql_template: r#"
            SELECT player_name, turnovers, team_name
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY turnovers DESC
            LIMIT 1
        "#,
        format_template: "{player_name} had {turnovers} turnovers ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_3pt_made",
        description: "Find player with most 3-pointers made",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading).*(?:3|three).*(?:pointer|pt|point)",
            r"(?:most|leading).*(?:3|three).*(?:pointer|pt|made)",
            r"(?:3|three).*point.*leader",
            r"who made.*most.*(?:3|three)",
            r"most (?:3|three)s",
        ],
        sql_template: r#"
            SELECT player_name, fg3_made, fg3_attempted, team_name
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY fg3_made DESC
            LIMIT 1
        "#,
        format_template: "{player_name} made {fg3_made} three-pointers ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_3pt_team",
        description: "Find player with most 3-pointers for a team",
        category: "individual",
        triggers: &[
            r"who (?:made|hit|shot).*most.*(?:3|three).*(?:for|on) (\w+)",
            r"(\w+)(?:'s)? (?:3|three).*point.*leader",
            r"most (?:3|three).*(?:for|on) (\w+)",
        ],
        sql_template: r#"
            SELECT player_name, fg3_made, fg3_attempted, team_name
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            ORDER BY fg3_made DESC
            LIMIT 1
        "#,
        format_template: "{player_name} led {team_name} with {fg3_made} three-pointers",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "best_fg_pct",
        description: "Find player with best FG% (min 5 attempts)",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*best.*(?:fg|field goal|shooting).*(?:pct|percent|%)",
            r"best.*shooter",
            r"highest.*(?:fg|field goal).*(?:pct|percent)",
            r"most efficient.*shooter",
        ],
        sql_template: r#"
            SELECT player_name, fg_made, fg_attempted,
                   ROUND(CAST(fg_made AS FLOAT) / fg_attempted * 100, 1) as fg_pct,
                   team_name
            FROM players
            WHERE game_id = '{game_id}'
              AND fg_attempted >= 5
            ORDER BY fg_pct DESC
            LIMIT 1
        "#,
        format_template: "{player_name} shot {fg_pct}% ({fg_made}-{fg_attempted}) from the field ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_minutes",
        description: "Find player with most minutes played",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|longest).*minutes",
            r"(?:most|longest).*minutes",
            r"who played.*(?:most|longest)",
            r"most playing time",
        ],
        sql_template: r#"
            SELECT player_name, minutes, team_name, points
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY minutes DESC
            LIMIT 1
        "#,
        format_template: "{player_name} played {minutes} minutes ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "double_double",
        description: "Find players with double-doubles",
        category: "individual",
        triggers: &[
            r"(?:did anyone|who).*(?:get|have|record).*double.*double",
            r"double.*double",
            r"any double.*double",
        ],
        sql_template: r#"
            SELECT player_name, points, rebounds, assists, team_name
            FROM players
            WHERE game_id = '{game_id}'
              AND (
                (points >= 10 AND rebounds >= 10) OR
                (points >= 10 AND assists >= 10) OR
                (rebounds >= 10 AND assists >= 10)
              )
        "#,
        format_template: "{player_name} had a double-double with {points} points and {rebounds} rebounds ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "most_fouls",
        description: "Find player with most fouls",
        category: "individual",
        triggers: &[
            r"(?:who|which player).*(?:most|leading).*fouls?",
            r"(?:most|leading).*fouls?",
            r"foul.*trouble",
        ],
        sql_template: r#"
            SELECT player_name, fouls, team_name, minutes
            FROM players
            WHERE game_id = '{game_id}'
            ORDER BY fouls DESC
            LIMIT 1
        "#,
        format_template: "{player_name} had {fouls} fouls ({team_name})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    // ------------------------------------------------------------------
    // Team stats
    // ------------------------------------------------------------------
    Rule {
        name: "final_score",
        description: "Get the final score of the game",
        category: "team",
        triggers: &[
            r"(?:what|final).*score",
            r"(?:score|result).*(?:game|match)",
            r"how (?:did|does).*(?:end|finish)",
            r"final.*(?:score|result)",
        ],
        sql_template: r#"
            SELECT away_team_name, away_team_score, home_team_name, home_team_score
            FROM games
            WHERE game_id = '{game_id}'
        "#,
        format_template: "{away_team_name} {away_team_score} - {home_team_name} {home_team_score}",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "winning_team",
        description: "Find which team won",
        category: "team",
        triggers: &[
            r"who won",
            r"which team won",
            r"winner",
            r"(?:did|does) (\w+) win",
        ],
        sql_template: r#"
            SELECT
                CASE WHEN home_team_score > away_team_score
                     THEN home_team_name ELSE away_team_name END as winner,
                CASE WHEN home_team_score > away_team_score
                     THEN home_team_score ELSE away_team_score END as winner_score,
                CASE WHEN home_team_score > away_team_score
                     THEN away_team_name ELSE home_team_name END as loser,
                CASE WHEN home_team_score > away_team_score
                     THEN away_team_score ELSE home_team_score END as loser_score
            FROM games
            WHERE game_id = '{game_id}'
        "#,
        format_template: "{winner} defeated {loser} {winner_score}-{loser_score}",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "point_margin",
        description: "Find the margin of victory",
        category: "team",
        triggers: &[
            r"(?:margin|difference).*(?:victory|points|score)",
            r"(?:by how (?:many|much)|win by)",
            r"(?:how (?:close|big)).*(?:game|win|loss)",
            r"point.*(?:margin|difference|spread)",
        ],
        sql_template: r#"
            SELECT
                ABS(home_team_score - away_team_score) as margin,
                CASE WHEN home_team_score > away_team_score
                     THEN home_team_name ELSE away_team_name END as winner,
                CASE WHEN home_team_score > away_team_score
                     THEN away_team_name ELSE home_team_name END as loser,
                home_team_score, away_team_score
            FROM games
            WHERE game_id = '{game_id}'
        "#,
        format_template: "{winner} won by {margin} points",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_total_points",
        description: "Get total points for a specific team",
        category: "team",
        triggers: &[
            r"how many points (?:did|does) (\w+) (?:score|have)",
            r"(\w+)(?:'s)? (?:total )?points",
            r"(?:total|final) points (?:for|of) (\w+)",
        ],
        sql_template: r#"
            SELECT
                CASE WHEN LOWER(home_team_name) LIKE '%{team}%'
                     THEN home_team_name ELSE away_team_name END as team_name,
                CASE WHEN LOWER(home_team_name) LIKE '%{team}%'
                     THEN home_team_score ELSE away_team_score END as points
            FROM games
            WHERE game_id = '{game_id}'
        "#,
        format_template: "{team_name} scored {points} points",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_rebounds",
        description: "Get total rebounds for a team",
        category: "team",
        triggers: &[
            r"how many rebounds (?:did|does) (\w+) (?:have|get)",
            r"(\w+)(?:'s)? (?:total )?rebounds",
            r"team rebounds (?:for|of) (\w+)",
        ],
        sql_template: r#"
            SELECT team_name, SUM(rebounds) as total_rebounds,
                   SUM(offensive_rebounds) as offensive_reb,
                   SUM(defensive_rebounds) as defensive_reb
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            GROUP BY team_name
        "#,
        format_template: "{team_name} had {total_rebounds} total rebounds ({offensive_reb} offensive, {defensive_reb} defensive)",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_assists",
        description: "Get total assists for a team",
        category: "team",
        triggers: &[
            r"how many assists (?:did|does) (\w+) (?:have|get)",
            r"(\w+)(?:'s)? (?:total )?assists",
            r"team assists (?:for|of) (\w+)",
        ],
        sql_template: r#"
            SELECT team_name, SUM(assists) as total_assists
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            GROUP BY team_name
        "#,
        format_template: "{team_name} had {total_assists} assists",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_fg_pct",
        description: "Get field goal percentage for a team",
        category: "team",
        triggers: &[
            r"(?:what|how).*(\w+)(?:'s)?.*(?:field goal|fg|shooting).*(?:pct|percent|%)",
            r"(\w+).*shot.*(?:field|from the field)",
            r"team.*(?:fg|shooting).*(?:pct|percent)",
        ],
        sql_template: r#"
            SELECT team_name,
                   SUM(fg_made) as fg_made,
                   SUM(fg_attempted) as fg_attempted,
                   ROUND(CAST(SUM(fg_made) AS FLOAT) / SUM(fg_attempted) * 100, 1) as fg_pct
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            GROUP BY team_name
        "#,
        format_template: "{team_name} shot {fg_pct}% from the field ({fg_made}-{fg_attempted})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_3pt_pct",
        description: "Get 3-point percentage for a team",
        category: "team",
        triggers: &[
            r"(?:what|how).*(\w+)(?:'s)?.*(?:3|three).*(?:point|pt).*(?:pct|percent|%)",
            r"(\w+).*shot.*(?:3|three)",
            r"team.*(?:3|three).*(?:pct|percent)",
        ],
        sql_template: r#"
            SELECT team_name,
                   SUM(fg3_made) as fg3_made,
                   SUM(fg3_attempted) as fg3_attempted,
                   ROUND(CAST(SUM(fg3_made) AS FLOAT) / SUM(fg3_attempted) * 100, 1) as fg3_pct
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            GROUP BY team_name
        "#,
        format_template: "{team_name} shot {fg3_pct}% from three ({fg3_made}-{fg3_attempted})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "team_turnovers",
        description: "Get total turnovers for a team",
        category: "team",
        triggers: &[
            r"how many turnovers (?:did|does) (\w+) (?:have|commit)",
            r"(\w+)(?:'s)? (?:total )?turnovers",
            r"team turnovers (?:for|of) (\w+)",
        ],
        sql_template: r#"
            SELECT team_name, SUM(turnovers) as total_turnovers
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
            GROUP BY team_name
        "#,
        format_template: "{team_name} committed {total_turnovers} turnovers",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "bench_points",
        description: "Get bench scoring for a team",
        category: "team",
        triggers: &[
            r"bench (?:points|scoring)",
            r"(?:non-starters?|reserves?).*(?:points|score)",
            r"how many points.*bench",
        ],
        sql_template: r#"
            SELECT team_name, SUM(points) as bench_points
            FROM players
            WHERE game_id = '{game_id}'
              AND starter = 0
            GROUP BY team_name
            ORDER BY bench_points DESC
        "#,
        format_template: "{team_name} bench scored {bench_points} points",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    // ------------------------------------------------------------------
    // Comparative
    // ------------------------------------------------------------------
    Rule {
        name: "better_shooting",
        description: "Compare field goal percentages",
        category: "comparative",
        triggers: &[
            r"(?:which|who).*(?:team)?.*(?:shot|shoot).*better",
            r"(?:better|best).*(?:shooting|shooter)",
            r"(?:compare|comparison).*shooting",
            r"(?:who|which).*(?:more|higher).*(?:fg|field goal).*(?:pct|percent)",
        ],
        sql_template: r#"
            SELECT team_name,
                   SUM(fg_made) as fg_made,
                   SUM(fg_attempted) as fg_attempted,
                   ROUND(CAST(SUM(fg_made) AS FLOAT) / SUM(fg_attempted) * 100, 1) as fg_pct
            FROM players
            WHERE game_id = '{game_id}'
            GROUP BY team_name
            ORDER BY fg_pct DESC
        "#,
        format_template: "{team_name} shot better at {fg_pct}% ({fg_made}-{fg_attempted})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "more_rebounds_compare",
        description: "Compare rebounds between teams",
        category: "comparative",
        triggers: &[
            r"(?:which|who).*(?:team)?.*(?:more|most).*rebounds?",
            r"(?:out)?rebound",
            r"(?:compare|comparison).*rebounds?",
            r"(?:rebounding).*(?:edge|advantage)",
        ],
        sql_template: r#"
            SELECT team_name, SUM(rebounds) as total_rebounds
            FROM players
            WHERE game_id = '{game_id}'
            GROUP BY team_name
            ORDER BY total_rebounds DESC
        "#,
        format_template: "{team_name} won the rebounding battle with {total_rebounds} boards",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "more_turnovers_compare",
        description: "Compare turnovers between teams",
        category: "comparative",
        triggers: &[
            r"(?:which|who).*(?:team)?.*(?:more|most|fewer|less).*turnovers?",
            r"turnover.*(?:battle|comparison|diff)",
            r"(?:better|worse).*(?:at )?(?:taking care|protecting)",
        ],
        sql_template: r#"
            SELECT team_name, SUM(turnovers) as total_turnovers
            FROM players
            WHERE game_id = '{game_id}'
            GROUP BY team_name
            ORDER BY total_turnovers ASC
        "#,
        format_template: "{team_name} was cleaner with the ball ({total_turnovers} turnovers)",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "close_game",
        description: "Determine if game was close",
        category: "comparative",
        triggers: &[
            r"(?:was|is).*(?:this|the|it).*(?:close|tight).*game",
            r"(?:close|tight).*(?:game|contest)",
            r"(?:how close|margin)",
        ],
        sql_template: r#"
            SELECT
                away_team_name, away_team_score,
                home_team_name, home_team_score,
                ABS(home_team_score - away_team_score) as margin
            FROM games
            WHERE game_id = '{game_id}'
        "#,
        format_template: "The game was decided by {margin} points ({away_team_name} {away_team_score} - {home_team_name} {home_team_score})",
        min_confidence: 0.9,
        requires_game_context: true,
    },
    Rule {
        name: "starters_for_team",
        description: "Get starters for a team",
        category: "roster",
        triggers: &[
            r"who started (?:for|on) (\w+)",
            r"(\w+)(?:'s)? (?:starting )?(?:lineup|five|starters)",
            r"starters (?:for|on) (\w+)",
        ],
        sql_template: r#"
            SELECT player_name, position, points, rebounds, assists
            FROM players
            WHERE game_id = '{game_id}'
              AND LOWER(team_name) LIKE '%{team}%'
              AND starter = 1
            ORDER BY points DESC
        "#,
        format_template: "{player_name} ({position}) started with {points} pts, {rebounds} reb, {assists} ast",
        min_confidence: 0.9,
        requires_game_context: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn test_rule_names_unique() {
        let mut seen = HashSet::new();
        for rule in PATTERNS {
            assert!(seen.insert(rule.name), "duplicate rule name: {}", rule.name);
        }
    }

    #[test]
    fn test_every_rule_has_triggers_and_game_id_slot() {
        for rule in PATTERNS {
            assert!(!rule.triggers.is_empty(), "{} has no triggers", rule.name);
            assert!(
                rule.sql_template.contains("{game_id}"),
                "{} is missing the game_id slot",
                rule.name
            );
        }
    }

    #[test]
    fn test_all_triggers_compile() {
        for rule in PATTERNS {
            for trigger in rule.triggers {
                assert!(
                    Regex::new(trigger).is_ok(),
                    "trigger fails to compile on {}: {}",
                    rule.name,
                    trigger
                );
            }
        }
    }

    #[test]
    fn test_format_slots_appear_in_sql() {
        // Every alphabetic format slot must name a column the SQL template can
        // produce; a slot the SQL never mentions would always hit the raw-row
        // fallback.
        let slot_re = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
        for rule in PATTERNS {
            for caps in slot_re.captures_iter(rule.format_template) {
                let slot = &caps[1];
                assert!(
                    rule.sql_template.contains(slot),
                    "format slot {{{}}} not present in SQL for {}",
                    slot,
                    rule.name
                );
            }
        }
    }

    #[test]
    fn test_confidence_baselines_in_range() {
        for rule in PATTERNS {
            assert!((0.0..=1.0).contains(&rule.min_confidence));
            assert!(rule.requires_game_context);
        }
    }
}
