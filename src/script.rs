//! Plain-text scorer scripts: one action per line, `#` starts a comment.
//!
//! ```text
//! striker Asha
//! non-striker Ben
//! bowler Eli
//! runs 4
//! wide off 1
//! out caught
//! runout 1 non-striker Ben
//! ```

use crate::error::{CreaseError, Result};
use crate::scoring::{End, ExtraKind, WicketKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Striker(String),
    NonStriker(String),
    Bowler(String),
    Runs(u32),
    Extra(ExtraKind, u32),
    Wicket(WicketKind),
    RunOut { runs: u32, end: End, player: String },
    Swap,
    Undo,
    ReleaseJoker,
    NextInnings,
}

impl Action {
    /// Deliveries are what the journal samples; selections are not.
    pub fn is_delivery(&self) -> bool {
        matches!(
            self,
            Self::Runs(_) | Self::Extra(..) | Self::Wicket(_) | Self::RunOut { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line in the script file.
    pub line: usize,
    pub text: String,
    pub action: Action,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = normalize(raw.split('#').next().unwrap_or_default());
        if text.is_empty() {
            continue;
        }
        let action = parse_action(&text).map_err(|message| CreaseError::Script {
            line: index + 1,
            message,
        })?;
        lines.push(ScriptLine {
            line: index + 1,
            text,
            action,
        });
    }
    Ok(lines)
}

pub fn parse_action(line: &str) -> std::result::Result<Action, String> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let Some((head, args)) = tokens.split_first() else {
        return Err("empty action".to_string());
    };

    match head.to_ascii_lowercase().as_str() {
        "striker" => name_arg(args).map(Action::Striker),
        "non-striker" | "nonstriker" => name_arg(args).map(Action::NonStriker),
        "bowler" => name_arg(args).map(Action::Bowler),
        "runs" | "r" => single_count(args).map(Action::Runs),
        "dot" => no_args(args).map(|()| Action::Runs(0)),
        "wide" | "wd" => parse_wide(args),
        "noball" | "no-ball" | "nb" => single_count(args).map(|n| Action::Extra(ExtraKind::NoBall, n)),
        "bye" | "b" => single_count(args).map(|n| Action::Extra(ExtraKind::Bye, n)),
        "legbye" | "leg-bye" | "lb" => {
            single_count(args).map(|n| Action::Extra(ExtraKind::LegBye, n))
        }
        "out" | "wicket" => match args {
            [kind] => WicketKind::parse(kind)
                .map(Action::Wicket)
                .ok_or_else(|| format!("unknown dismissal '{kind}'")),
            _ => Err("usage: out bowled|caught|lbw|stumped|hit-wicket".to_string()),
        },
        "runout" | "run-out" => parse_run_out(args),
        "swap" => no_args(args).map(|()| Action::Swap),
        "undo" => no_args(args).map(|()| Action::Undo),
        "release-joker" => no_args(args).map(|()| Action::ReleaseJoker),
        "next-innings" => no_args(args).map(|()| Action::NextInnings),
        other => Err(format!("unknown action '{other}'")),
    }
}

fn parse_wide(args: &[&str]) -> std::result::Result<Action, String> {
    let (kind, rest) = match args.split_first() {
        Some((side, rest)) if side.eq_ignore_ascii_case("off") => (ExtraKind::OffSideWide, rest),
        Some((side, rest)) if side.eq_ignore_ascii_case("leg") => (ExtraKind::LegSideWide, rest),
        _ => (ExtraKind::OffSideWide, args),
    };
    single_count(rest).map(|n| Action::Extra(kind, n))
}

fn parse_run_out(args: &[&str]) -> std::result::Result<Action, String> {
    const USAGE: &str = "usage: runout RUNS striker|non-striker NAME";
    let [runs, end, name @ ..] = args else {
        return Err(USAGE.to_string());
    };
    let runs = count(runs)?;
    let end = match end.to_ascii_lowercase().as_str() {
        "striker" => End::Striker,
        "non-striker" | "nonstriker" => End::NonStriker,
        _ => return Err(USAGE.to_string()),
    };
    let player = name_arg(name)?;
    Ok(Action::RunOut { runs, end, player })
}

fn name_arg(args: &[&str]) -> std::result::Result<String, String> {
    if args.is_empty() {
        return Err("player name required".to_string());
    }
    Ok(args.join(" "))
}

fn single_count(args: &[&str]) -> std::result::Result<u32, String> {
    match args {
        [value] => count(value),
        _ => Err("expected exactly one run count".to_string()),
    }
}

fn count(value: &str) -> std::result::Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("'{value}' is not a run count"))
}

fn no_args(args: &[&str]) -> std::result::Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected argument(s): {}", args.join(" ")))
    }
}

fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selections_with_multi_word_names() {
        assert_eq!(
            parse_action("striker Mary  Ann"),
            Ok(Action::Striker("Mary Ann".to_string()))
        );
        assert_eq!(
            parse_action("Bowler Eli"),
            Ok(Action::Bowler("Eli".to_string()))
        );
    }

    #[test]
    fn parses_extras_with_side_defaults() {
        assert_eq!(
            parse_action("wide 1"),
            Ok(Action::Extra(ExtraKind::OffSideWide, 1))
        );
        assert_eq!(
            parse_action("wide leg 3"),
            Ok(Action::Extra(ExtraKind::LegSideWide, 3))
        );
        assert_eq!(parse_action("lb 1"), Ok(Action::Extra(ExtraKind::LegBye, 1)));
    }

    #[test]
    fn parses_run_out() {
        assert_eq!(
            parse_action("runout 1 non-striker Ben Stokes"),
            Ok(Action::RunOut {
                runs: 1,
                end: End::NonStriker,
                player: "Ben Stokes".to_string(),
            })
        );
        assert!(parse_action("runout 1 bowler Ben").is_err());
        assert!(parse_action("runout x striker Ben").is_err());
    }

    #[test]
    fn rejects_unknown_actions_and_bad_counts() {
        assert!(parse_action("declare").is_err());
        assert!(parse_action("runs four").is_err());
        assert!(parse_action("runs 1 2").is_err());
        assert!(parse_action("undo now").is_err());
        assert!(parse_action("out run-out").is_err());
    }

    #[test]
    fn script_skips_comments_and_reports_line_numbers() {
        let script = "# openers\nstriker Asha\n\nruns 4 # boundary\nbogus\n";
        let err = parse_script(script).expect_err("line 5 is invalid");
        assert!(err.to_string().contains("line 5"));

        let ok = parse_script("striker Asha\n\nruns 4 # boundary\n").expect("valid script");
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].line, 3);
        assert_eq!(ok[1].action, Action::Runs(4));
        assert!(ok[1].action.is_delivery());
        assert!(!ok[0].action.is_delivery());
    }
}
