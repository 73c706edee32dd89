//! Replays a scorer script against the innings state machine.

use crate::error::{CreaseError, Result};
use crate::journal::MatchJournal;
use crate::scoring::{Innings, NextAction, Outcome, ScoringError};
use crate::script::{Action, ScriptLine};
use crate::types::player::{overs_notation, PlayerId};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub line: usize,
    pub text: String,
    pub error: ScoringError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    pub applied: usize,
    pub rejections: Vec<Rejection>,
    pub advisories: Vec<(usize, String)>,
    /// Set when `--strict` cut the replay short.
    pub stopped_at: Option<usize>,
}

pub struct ReplayOptions {
    pub strict: bool,
}

pub fn replay(
    innings: &mut Innings,
    lines: &[ScriptLine],
    journal: &mut MatchJournal,
    options: &ReplayOptions,
) -> Result<Replay> {
    let mut replay = Replay::default();
    for line in lines {
        let before = innings.innings_number();
        match apply(innings, &line.action) {
            Ok(outcome) => {
                replay.applied += 1;
                debug!(line = line.line, action = %line.text, next = ?outcome.next, "applied");
                if let Some(note) = &outcome.advisory {
                    warn!(line = line.line, %note, "advisory");
                    replay.advisories.push((line.line, note.clone()));
                }
                write_journal(innings, journal, line, &outcome, before)?;
            }
            Err(error) => {
                replay.rejections.push(Rejection {
                    line: line.line,
                    text: line.text.clone(),
                    error,
                });
                if options.strict {
                    replay.stopped_at = Some(line.line);
                    break;
                }
            }
        }
    }
    journal.flush()?;
    Ok(replay)
}

fn apply(innings: &mut Innings, action: &Action) -> std::result::Result<Outcome, ScoringError> {
    match action {
        Action::Striker(name) => innings.select_striker(resolve(innings, name)?),
        Action::NonStriker(name) => innings.select_non_striker(resolve(innings, name)?),
        Action::Bowler(name) => innings.select_bowler(resolve(innings, name)?),
        Action::Runs(runs) => innings.score_runs(*runs),
        Action::Extra(kind, runs) => innings.record_extra(*kind, *runs),
        Action::Wicket(kind) => innings.record_wicket(*kind),
        Action::RunOut { runs, end, player } => {
            let id = resolve(innings, player)?;
            innings.record_run_out(*runs, id, *end)
        }
        Action::Swap => innings.swap_strike(),
        Action::Undo => innings.undo(),
        Action::ReleaseJoker => innings.release_joker(),
        Action::NextInnings => innings.transition_to_second_innings(),
    }
}

fn resolve(innings: &Innings, name: &str) -> std::result::Result<PlayerId, ScoringError> {
    innings
        .find_player(name)
        .ok_or_else(|| ScoringError::PlayerNotFound(name.to_string()))
}

pub fn score_line(innings: &Innings) -> String {
    format!(
        "{}/{} ({})",
        innings.total_runs(),
        innings.wickets(),
        overs_notation(innings.legal_balls())
    )
}

fn write_journal(
    innings: &Innings,
    journal: &mut MatchJournal,
    line: &ScriptLine,
    outcome: &Outcome,
    innings_before: u8,
) -> Result<()> {
    let score = score_line(innings);
    let number = innings.innings_number();

    if line.action.is_delivery() {
        journal.record_delivery(number, &score, "delivery", &line.text)?;
    }
    if matches!(line.action, Action::Wicket(_) | Action::RunOut { .. }) {
        journal.record_milestone(number, &score, "wicket", &line.text)?;
    }
    if outcome.over_completed {
        let detail = format!("over {} complete", innings.completed_overs());
        journal.record_milestone(number, &score, "over", &detail)?;
    }
    if number != innings_before {
        let target = innings.target().unwrap_or_default();
        journal.record_milestone(number, &score, "innings", &format!("target {target}"))?;
    } else if line.action.is_delivery()
        && matches!(
            outcome.next,
            NextAction::InningsComplete | NextAction::MatchComplete
        )
    {
        journal.record_milestone(number, &score, "innings-complete", innings.batting_team())?;
    }
    Ok(())
}

pub fn read_script(path: &std::path::Path) -> Result<Vec<ScriptLine>> {
    if !path.exists() {
        return Err(CreaseError::PathNotFound(path.display().to_string()));
    }
    let source = std::fs::read_to_string(path)?;
    crate::script::parse_script(&source)
}
