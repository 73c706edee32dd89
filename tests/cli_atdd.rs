#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ONE_OVER_MATCH: &str = r#"
[match]
format = "Backyard"
overs = 1

[teams.home]
name = "Hawks"
players = ["Asha", "Ben", "Cara"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli", "Fay"]
"#;

const JOKER_MATCH: &str = r#"
[match]
overs = 2

[joker]
name = "Sam"
max_overs = 1

[teams.home]
name = "Hawks"
players = ["Asha", "Ben", "Cara"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli", "Fay"]
"#;

const FULL_SCRIPT: &str = "\
# first innings
striker Asha
non-striker Ben
bowler Dev
runs 4
runs 1
runs 0
runs 6
runs 0
runs 0
next-innings
# chase of 12
striker Dev
non-striker Eli
bowler Asha
runs 6
runs 6
";

fn crease() -> Command {
    Command::cargo_bin("crease").expect("binary should compile")
}

fn match_dir(config: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::write(dir.path().join("crease.toml"), config).expect("config should write");
    dir
}

fn write_script(dir: &Path, script: &str) -> std::path::PathBuf {
    let path = dir.join("match.txt");
    fs::write(&path, script).expect("script should write");
    path
}

#[test]
fn complete_match_is_finalized_saved_and_listed() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(dir.path(), FULL_SCRIPT);

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("**Owls won by 10 wickets**"))
        .stdout(predicate::str::contains("## First innings: Hawks 11/0"));

    let store = fs::read_to_string(dir.path().join(".crease/matches.json"))
        .expect("store should be written");
    let records: serde_json::Value = serde_json::from_str(&store).expect("store is json");
    assert_eq!(records.as_array().map(Vec::len), Some(1));
    assert_eq!(records[0]["winner"], "Owls");
    assert_eq!(records[0]["margin"], "by 10 wickets");

    let journal = fs::read_to_string(dir.path().join(".crease/journal.md"))
        .expect("journal should be written");
    assert!(journal.contains("event: start | detail: Hawks v Owls"));
    assert!(journal.contains("event: innings | detail: target 12"));
    assert!(journal.contains("event: result | detail: Owls won by 10 wickets"));

    crease()
        .arg("history")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hawks v Owls | 11/0 v 12/0 | Owls won by 10 wickets"));
}

#[test]
fn dry_run_does_not_save() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(dir.path(), FULL_SCRIPT);

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .arg("--dry-run")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"winner\": \"Owls\""));

    assert!(!dir.path().join(".crease/matches.json").exists());
    crease()
        .arg("history")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- none"));
}

#[test]
fn rejected_actions_are_reported_and_replay_continues() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(
        dir.path(),
        &FULL_SCRIPT.replace("bowler Dev\n", "bowler Zed\nbowler Dev\n"),
    );

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "line 4: rejected: player not found: Zed",
        ))
        .stdout(predicate::str::contains("Owls won by 10 wickets"));
}

#[test]
fn unfinished_match_prints_scoreboard_and_exits_incomplete() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(
        dir.path(),
        "striker Asha\nnon-striker Ben\nbowler Dev\nruns 4\nwide off 2\n",
    );

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Score: 6/0 in 0.1 overs (extras 2)"))
        .stdout(predicate::str::contains("- this over: 4 Wd+2"));
    assert!(!dir.path().join(".crease/matches.json").exists());
}

#[test]
fn scoreboard_json_reports_next_action() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(dir.path(), "striker Asha\nnon-striker Ben\n");

    let output = crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .arg("--format")
        .arg("json")
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let board: serde_json::Value =
        serde_json::from_slice(&output).expect("scoreboard should be json");
    assert_eq!(board["next"]["action"], "select_bowler");
    assert_eq!(board["striker"], "Asha");
    assert_eq!(board["eligible_bowlers"].as_array().map(Vec::len), Some(3));
    assert!(board["joker"].is_null());
}

#[test]
fn strict_mode_stops_at_first_rejection() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(dir.path(), "striker Asha\nruns 1\nnon-striker Ben\n");

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 2: rejected: no non-striker selected"))
        .stderr(predicate::str::contains("stopped at line 2"))
        .stdout(predicate::str::contains("- non-striker: -"));
}

#[test]
fn malformed_script_is_a_runtime_failure() {
    let dir = match_dir(ONE_OVER_MATCH);
    let script = write_script(dir.path(), "striker Asha\nruns four\n");

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("script error on line 2"));
}

#[test]
fn invalid_rules_fall_back_to_defaults_with_warning() {
    let dir = match_dir(&ONE_OVER_MATCH.replace("overs = 1", "overs = 0"));

    crease()
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("20 over(s)"))
        .stderr(predicate::str::contains("default rules will be used"));
}

#[test]
fn duplicate_player_names_are_rejected() {
    let dir = match_dir(&ONE_OVER_MATCH.replace("\"Fay\"", "\"asha\""));

    crease()
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn joker_usage_is_shown_on_the_scoreboard() {
    let dir = match_dir(JOKER_MATCH);
    let script = write_script(
        dir.path(),
        "striker Asha\nnon-striker Ben\nbowler Sam\nruns 0\nruns 0\nruns 0\nruns 0\nruns 0\nruns 0\n",
    );

    crease()
        .arg("play")
        .arg(dir.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Joker Sam: 6 ball(s) bowled, can bat: no, can bowl: no",
        ))
        .stdout(predicate::str::contains("Eligible bowlers: Dev, Eli, Fay"));
}
