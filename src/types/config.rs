use crate::error::CreaseError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything `crease.toml` can hold after layering.
#[derive(Debug, Clone, Deserialize)]
pub struct CreaseConfig {
    #[serde(rename = "match", default)]
    pub rules: MatchRules,
    #[serde(default)]
    pub extras: ExtrasConfig,
    #[serde(default)]
    pub joker: JokerConfig,
    pub teams: TeamsConfig,
    pub journal: Option<JournalConfig>,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRules {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_overs")]
    pub overs: u32,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    pub max_overs_per_bowler: Option<u32>,
    #[serde(default)]
    pub single_side_batting: bool,
    #[serde(default)]
    pub batting_first: BattingFirst,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            format: default_format(),
            overs: default_overs(),
            max_players: default_max_players(),
            max_overs_per_bowler: None,
            single_side_batting: false,
            batting_first: BattingFirst::Home,
        }
    }
}

fn default_format() -> String {
    "T20".to_string()
}

fn default_overs() -> u32 {
    20
}

fn default_max_players() -> u32 {
    11
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattingFirst {
    #[default]
    Home,
    Away,
}

/// Base runs awarded automatically for each kind of extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasConfig {
    #[serde(default = "one")]
    pub off_side_wide: u32,
    #[serde(default = "one")]
    pub leg_side_wide: u32,
    #[serde(default = "one")]
    pub no_ball: u32,
    #[serde(default)]
    pub bye: u32,
    #[serde(default)]
    pub leg_bye: u32,
}

impl Default for ExtrasConfig {
    fn default() -> Self {
        Self {
            off_side_wide: 1,
            leg_side_wide: 1,
            no_ball: 1,
            bye: 0,
            leg_bye: 0,
        }
    }
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct JokerConfig {
    pub name: Option<String>,
    #[serde(default = "default_joker_overs")]
    pub max_overs: u32,
}

impl Default for JokerConfig {
    fn default() -> Self {
        Self {
            name: None,
            max_overs: default_joker_overs(),
        }
    }
}

fn default_joker_overs() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamsConfig {
    pub home: TeamConfig,
    pub away: TeamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSampling {
    Milestones,
    All,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    pub file: Option<String>,
    pub sampling: Option<JournalSampling>,
    pub batch_interval_secs: Option<u32>,
    pub max_log_size_kb: Option<u32>,
    pub retained_logs: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub file: Option<String>,
}

/// The read-only rules bundle the scoring core is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub format: String,
    pub total_overs: u32,
    pub max_players: u32,
    pub max_overs_per_bowler: Option<u32>,
    pub joker_max_overs: u32,
    pub single_side_batting: bool,
    pub extras: ExtrasConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let rules = MatchRules::default();
        Self {
            format: rules.format,
            total_overs: rules.overs,
            max_players: rules.max_players,
            max_overs_per_bowler: None,
            joker_max_overs: default_joker_overs(),
            single_side_batting: false,
            extras: ExtrasConfig::default(),
        }
    }
}

/// Upper bound for every over count in the rules.
pub const MAX_OVERS: u32 = 200;

impl MatchConfig {
    pub fn joker_ball_cap(&self) -> u32 {
        self.joker_max_overs.saturating_mul(6)
    }

    pub fn bowler_ball_cap(&self) -> Option<u32> {
        self.max_overs_per_bowler.map(|overs| overs.saturating_mul(6))
    }

    pub fn validate(&self) -> Result<(), CreaseError> {
        if self.format.trim().is_empty() {
            return Err(CreaseError::ConfigParse(
                "match.format must not be empty".to_string(),
            ));
        }
        if self.total_overs == 0 {
            return Err(CreaseError::ConfigParse(
                "match.overs must be greater than 0".to_string(),
            ));
        }
        for (key, overs) in [
            ("match.overs", Some(self.total_overs)),
            ("match.max_overs_per_bowler", self.max_overs_per_bowler),
            ("joker.max_overs", Some(self.joker_max_overs)),
        ] {
            if overs.is_some_and(|overs| overs > MAX_OVERS) {
                return Err(CreaseError::ConfigParse(format!(
                    "{key} must be at most {MAX_OVERS}"
                )));
            }
        }
        if self.max_players < 2 {
            return Err(CreaseError::ConfigParse(
                "match.max_players must be at least 2".to_string(),
            ));
        }
        if self.max_overs_per_bowler == Some(0) {
            return Err(CreaseError::ConfigParse(
                "match.max_overs_per_bowler must be greater than 0 when set".to_string(),
            ));
        }
        let extras = self.extras;
        if [
            extras.off_side_wide,
            extras.leg_side_wide,
            extras.no_ball,
            extras.bye,
            extras.leg_bye,
        ]
        .iter()
        .any(|runs| *runs > 6)
        {
            return Err(CreaseError::ConfigParse(
                "extras base runs must be between 0 and 6".to_string(),
            ));
        }
        Ok(())
    }
}

impl CreaseConfig {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            format: self.rules.format.clone(),
            total_overs: self.rules.overs,
            max_players: self.rules.max_players,
            max_overs_per_bowler: self.rules.max_overs_per_bowler,
            joker_max_overs: self.joker.max_overs,
            single_side_batting: self.rules.single_side_batting,
            extras: self.extras,
        }
    }

    /// Rules that fail validation fall back to the defaults; the caller decides
    /// whether to warn about it.
    pub fn effective_match_config(&self) -> (MatchConfig, Option<CreaseError>) {
        let config = self.match_config();
        match config.validate() {
            Ok(()) => (config, None),
            Err(error) => (MatchConfig::default(), Some(error)),
        }
    }

    pub fn validate_teams(&self, max_players: u32) -> Result<(), CreaseError> {
        let mut seen = HashSet::<String>::new();
        for (side, team) in [("home", &self.teams.home), ("away", &self.teams.away)] {
            if team.name.trim().is_empty() {
                return Err(CreaseError::ConfigParse(format!(
                    "teams.{side}.name must not be empty"
                )));
            }
            if team.players.len() < 2 {
                return Err(CreaseError::ConfigParse(format!(
                    "teams.{side}.players needs at least 2 players"
                )));
            }
            if team.players.len() > max_players as usize {
                return Err(CreaseError::ConfigParse(format!(
                    "teams.{side}.players has {} players, more than match.max_players = {max_players}",
                    team.players.len()
                )));
            }
            for player in &team.players {
                let normalized = player.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(CreaseError::ConfigParse(format!(
                        "teams.{side}.players entries must be non-empty names"
                    )));
                }
                if !seen.insert(normalized) {
                    return Err(CreaseError::ConfigParse(format!(
                        "player '{}' appears more than once",
                        player.trim()
                    )));
                }
            }
        }

        if let Some(joker) = &self.joker.name {
            let normalized = joker.trim().to_lowercase();
            if normalized.is_empty() {
                return Err(CreaseError::ConfigParse(
                    "joker.name must not be empty when set".to_string(),
                ));
            }
            if seen.contains(&normalized) {
                return Err(CreaseError::ConfigParse(format!(
                    "joker '{}' cannot also be listed in a team",
                    joker.trim()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[teams.home]
name = "Falcons"
players = ["Asha", "Ben", "Chen"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli", "Fay"]
"#;

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let cfg: CreaseConfig = toml::from_str(MINIMAL).expect("minimal config should parse");
        let rules = cfg.match_config();
        assert_eq!(rules.total_overs, 20);
        assert_eq!(rules.format, "T20");
        assert_eq!(rules.extras.off_side_wide, 1);
        assert_eq!(rules.extras.bye, 0);
        assert_eq!(rules.joker_max_overs, 2);
        assert_eq!(cfg.rules.batting_first, BattingFirst::Home);
        assert!(cfg.validate_teams(rules.max_players).is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[match]
format = "Box 6"
overs = 6
max_players = 6
max_overs_per_bowler = 2
single_side_batting = true
batting_first = "away"

[extras]
off_side_wide = 2
leg_side_wide = 1
no_ball = 2
bye = 1
leg_bye = 1

[joker]
name = "Jo"
max_overs = 1

[teams.home]
name = "Falcons"
players = ["Asha", "Ben"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli"]

[journal]
sampling = "all"
"#;
        let cfg: CreaseConfig = toml::from_str(toml_str).expect("full config should parse");
        let rules = cfg.match_config();
        assert_eq!(rules.total_overs, 6);
        assert_eq!(rules.bowler_ball_cap(), Some(12));
        assert_eq!(rules.joker_ball_cap(), 6);
        assert!(rules.single_side_batting);
        assert_eq!(rules.extras.off_side_wide, 2);
        assert_eq!(cfg.rules.batting_first, BattingFirst::Away);
        assert!(matches!(
            cfg.journal.as_ref().and_then(|journal| journal.sampling.as_ref()),
            Some(JournalSampling::All)
        ));
    }

    #[test]
    fn invalid_rules_fall_back_to_defaults() {
        let toml_str = format!("[match]\novers = 0\n{MINIMAL}");
        let cfg: CreaseConfig = toml::from_str(&toml_str).expect("config should parse");
        let (rules, problem) = cfg.effective_match_config();
        assert_eq!(rules, MatchConfig::default());
        assert!(problem
            .expect("overs = 0 should be reported")
            .to_string()
            .contains("match.overs must be greater than 0"));
    }

    #[test]
    fn validate_rejects_duplicate_player_names_across_teams() {
        let toml_str = r#"
[teams.home]
name = "Falcons"
players = ["Asha", "Ben"]

[teams.away]
name = "Owls"
players = ["asha", "Eli"]
"#;
        let cfg: CreaseConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate_teams(11).expect_err("duplicate should fail");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn validate_rejects_oversized_team() {
        let cfg: CreaseConfig = toml::from_str(MINIMAL).expect("config should parse");
        let err = cfg.validate_teams(2).expect_err("team larger than cap should fail");
        assert!(err.to_string().contains("max_players"));
    }

    #[test]
    fn validate_rejects_joker_listed_in_team() {
        let toml_str = format!("[joker]\nname = \"Ben\"\n{MINIMAL}");
        let cfg: CreaseConfig = toml::from_str(&toml_str).expect("config should parse");
        let err = cfg.validate_teams(11).expect_err("joker in a team should fail");
        assert!(err.to_string().contains("cannot also be listed"));
    }

    #[test]
    fn validate_rejects_zero_bowler_cap() {
        let config = MatchConfig {
            max_overs_per_bowler: Some(0),
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_every_over_count() {
        let huge = MAX_OVERS + 1;
        for config in [
            MatchConfig {
                total_overs: huge,
                ..MatchConfig::default()
            },
            MatchConfig {
                max_overs_per_bowler: Some(u32::MAX),
                ..MatchConfig::default()
            },
            MatchConfig {
                joker_max_overs: huge,
                ..MatchConfig::default()
            },
        ] {
            let err = config.validate().expect_err("over count out of range");
            assert!(err.to_string().contains("at most 200"));
        }
        let unchecked = MatchConfig {
            joker_max_overs: u32::MAX,
            max_overs_per_bowler: Some(u32::MAX),
            ..MatchConfig::default()
        };
        assert_eq!(unchecked.joker_ball_cap(), u32::MAX);
        assert_eq!(unchecked.bowler_ball_cap(), Some(u32::MAX));
    }
}
