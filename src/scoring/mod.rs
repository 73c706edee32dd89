//! Live ball-by-ball scoring: the innings state machine and the pure rules
//! it consults.

pub mod delivery;
pub mod eligibility;
pub mod extras;
pub mod history;
pub mod innings;
pub mod result;

pub use extras::ExtraKind;
pub use innings::Innings;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an action is refused. A refused action never mutates state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("no striker selected")]
    NoStriker,

    #[error("no non-striker selected")]
    NoNonStriker,

    #[error("no bowler selected")]
    NoBowler,

    #[error("innings is complete")]
    InningsComplete,

    #[error("innings is not complete yet")]
    InningsNotComplete,

    #[error("second innings already under way")]
    NotFirstInnings,

    #[error("match already finalized")]
    MatchFinalized,

    #[error("bowler not allowed: {0}")]
    IneligibleBowler(String),

    #[error("batter not allowed: {0}")]
    IneligibleBatter(String),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("cannot undo past the start of the second innings")]
    UndoBoundary,

    #[error("{kind} needs at least {base} run(s), got {given}")]
    ExtraBelowBase {
        kind: ExtraKind,
        base: u32,
        given: u32,
    },

    #[error("joker is not on the bowling side")]
    JokerNotBowling,

    #[error("{given} run(s) off one delivery is more than the {max} allowed")]
    TooManyRuns { given: u32, max: u32 },
}

/// Most runs a single delivery can add, overthrows included.
pub const MAX_RUNS_PER_DELIVERY: u32 = 12;

/// Rejects run counts no delivery can produce before anything is mutated.
pub(crate) fn check_runs(given: u32) -> Result<(), ScoringError> {
    if given > MAX_RUNS_PER_DELIVERY {
        Err(ScoringError::TooManyRuns {
            given,
            max: MAX_RUNS_PER_DELIVERY,
        })
    } else {
        Ok(())
    }
}

/// Which end of the pitch a batter occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum End {
    Striker,
    NonStriker,
}

impl End {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Striker => "striker",
            Self::NonStriker => "non-striker",
        }
    }
}

/// What the scorer has to do before the next delivery can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "end", rename_all = "snake_case")]
pub enum NextAction {
    Continue,
    SelectBatter(End),
    SelectBowler,
    InningsComplete,
    MatchComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    Stumped,
    HitWicket,
}

impl WicketKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "bowled" | "b" => Some(Self::Bowled),
            "caught" | "c" => Some(Self::Caught),
            "lbw" => Some(Self::Lbw),
            "stumped" | "st" => Some(Self::Stumped),
            "hit-wicket" | "hitwicket" | "hw" => Some(Self::HitWicket),
            _ => None,
        }
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub next: NextAction,
    pub over_completed: bool,
    /// Non-fatal note about scorer input that was honoured as given.
    pub advisory: Option<String>,
}
