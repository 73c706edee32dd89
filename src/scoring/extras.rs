use crate::types::config::ExtrasConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraKind {
    OffSideWide,
    LegSideWide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Wides and no-balls are re-bowled; byes and leg-byes use up the ball.
    pub fn is_legal_delivery(self) -> bool {
        matches!(self, Self::Bye | Self::LegBye)
    }

    pub fn base_runs(self, extras: &ExtrasConfig) -> u32 {
        match self {
            Self::OffSideWide => extras.off_side_wide,
            Self::LegSideWide => extras.leg_side_wide,
            Self::NoBall => extras.no_ball,
            Self::Bye => extras.bye,
            Self::LegBye => extras.leg_bye,
        }
    }

    pub fn label(self, total_runs: u32) -> String {
        let prefix = match self {
            Self::OffSideWide | Self::LegSideWide => "Wd",
            Self::NoBall => "Nb",
            Self::Bye => "B",
            Self::LegBye => "Lb",
        };
        format!("{prefix}+{total_runs}")
    }
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OffSideWide => "off-side wide",
            Self::LegSideWide => "leg-side wide",
            Self::NoBall => "no-ball",
            Self::Bye => "bye",
            Self::LegBye => "leg-bye",
        };
        f.write_str(name)
    }
}

/// True when the runs actually run on top of the automatic penalty are odd,
/// which is what sends the batters to opposite ends.
pub fn additional_runs_parity(total_runs: u32, base_runs: u32) -> bool {
    total_runs.saturating_sub(base_runs) % 2 == 1
}
