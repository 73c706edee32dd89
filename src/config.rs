use crate::error::{CreaseError, Result};
use crate::types::config::{CreaseConfig, MatchConfig};
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "crease.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".crease/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/crease/config.toml";

/// A match directory's configuration plus the rules the scoring core will use.
#[derive(Debug, Clone)]
pub struct LoadedMatch {
    pub config: CreaseConfig,
    pub rules: MatchConfig,
}

pub fn load_config(root: &Path) -> Result<Option<CreaseConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<CreaseConfig>> {
    let match_path = root.join(DEFAULT_CONFIG_FILE);
    if !match_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &match_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: CreaseConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| CreaseError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

/// Loads and checks a match directory. Broken match rules fall back to the
/// defaults with a warning; broken rosters are an error.
pub fn load_match(root: &Path) -> Result<LoadedMatch> {
    let config = load_config(root)?.ok_or_else(|| {
        CreaseError::ConfigNotFound(root.join(DEFAULT_CONFIG_FILE).display().to_string())
    })?;
    resolve(config)
}

pub(crate) fn resolve(config: CreaseConfig) -> Result<LoadedMatch> {
    let (rules, problem) = config.effective_match_config();
    if let Some(problem) = problem {
        warn!(%problem, "invalid match rules; using defaults");
    }
    config.validate_teams(rules.max_players)?;
    Ok(LoadedMatch { config, rules })
}

pub const STARTER_CONFIG: &str = r#"# crease match configuration

[match]
format = "T20"
overs = 20
max_players = 11
# max_overs_per_bowler = 4
single_side_batting = false
batting_first = "home"

[extras]
off_side_wide = 1
leg_side_wide = 1
no_ball = 1
bye = 0
leg_bye = 0

[joker]
# name = "Sam"
max_overs = 2

[teams.home]
name = "Home XI"
players = ["Home 1", "Home 2", "Home 3", "Home 4", "Home 5", "Home 6"]

[teams.away]
name = "Away XI"
players = ["Away 1", "Away 2", "Away 3", "Away 4", "Away 5", "Away 6"]

[journal]
sampling = "milestones"
"#;

/// Writes [`STARTER_CONFIG`] into `root`. Returns `None` when a config already
/// exists and `force` is off.
pub fn write_starter_config(root: &Path, force: bool) -> Result<Option<PathBuf>> {
    let path = root.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        return Ok(None);
    }
    std::fs::create_dir_all(root)?;
    std::fs::write(&path, STARTER_CONFIG)?;
    Ok(Some(path))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| CreaseError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEAMS: &str = r#"
[teams.home]
name = "Falcons"
players = ["Asha", "Ben", "Chen"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli", "Fay"]
"#;

    #[test]
    fn load_config_returns_none_when_match_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn load_config_merges_global_match_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[match]
overs = 8
max_overs_per_bowler = 2

[extras]
bye = 1
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            format!("[match]\nformat = \"Sunday league\"\novers = 12\n{TEAMS}"),
        )
        .expect("match config should write");

        fs::create_dir_all(root.path().join(".crease")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[match]
single_side_batting = true
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");
        let rules = cfg.match_config();

        assert_eq!(rules.format, "Sunday league");
        assert_eq!(rules.total_overs, 12);
        assert_eq!(rules.max_overs_per_bowler, Some(2));
        assert!(rules.single_side_batting);
        assert_eq!(rules.extras.bye, 1);
        assert_eq!(cfg.teams.home.name, "Falcons");
    }

    #[test]
    fn unparsable_config_is_a_parse_error() {
        let root = TempDir::new().expect("temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[match\novers = ")
            .expect("broken config should write");
        let err = load_config_with_global(root.path(), None).expect_err("parse should fail");
        assert!(matches!(err, CreaseError::ConfigParse(_)));
    }

    #[test]
    fn resolve_substitutes_default_rules() {
        let cfg: CreaseConfig = toml::from_str(&format!("[match]\nmax_players = 1\n{TEAMS}"))
            .expect("config should parse");
        let loaded = resolve(cfg).expect("rosters are fine");
        assert_eq!(loaded.rules, MatchConfig::default());
    }

    #[test]
    fn load_match_requires_config_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_match(dir.path()).expect_err("missing config should fail");
        assert!(matches!(err, CreaseError::ConfigNotFound(_)));
    }

    #[test]
    fn starter_config_loads_and_is_not_overwritten() {
        let root = TempDir::new().expect("temp dir should be created");
        let path = write_starter_config(root.path(), false)
            .expect("write should succeed")
            .expect("fresh directory gets a config");
        assert!(path.ends_with(DEFAULT_CONFIG_FILE));

        let cfg = load_config_with_global(root.path(), None)
            .expect("load should succeed")
            .expect("config should exist");
        let loaded = resolve(cfg).expect("starter config should validate");
        assert_eq!(loaded.rules, MatchConfig::default());
        assert_eq!(loaded.config.teams.home.players.len(), 6);

        assert!(write_starter_config(root.path(), false)
            .expect("second write should not fail")
            .is_none());
        assert!(write_starter_config(root.path(), true)
            .expect("forced write should succeed")
            .is_some());
    }
}
