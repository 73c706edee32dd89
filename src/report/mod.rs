pub mod json;
pub mod md;

use crate::error::CreaseError;
use crate::scoring::delivery::DeliveryRecord;
use crate::scoring::eligibility::Verdict;
use crate::scoring::{Innings, NextAction};
use crate::types::player::{overs_notation, Player};
use crate::types::record::{InningsSummary, MatchRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Point-in-time view of a match, detached from the live state machine.
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    pub innings: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub extras: u32,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub striker: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: Option<String>,
    pub this_over: Vec<DeliveryRecord>,
    pub next: NextAction,
    /// Filled only while the scorer has to pick a bowler.
    pub eligible_bowlers: Vec<String>,
    pub joker: Option<JokerStatus>,
    pub batting: Vec<Player>,
    pub bowling: Vec<Player>,
    pub first_innings: Option<InningsSummary>,
    pub result: Option<MatchRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JokerStatus {
    pub name: String,
    pub balls_bowled: u32,
    pub can_bat: bool,
    pub can_bowl: bool,
}

impl Scoreboard {
    pub fn from_innings(innings: &Innings) -> Self {
        let name = |player: Option<&Player>| player.map(|player| player.name.clone());
        Self {
            innings: innings.innings_number(),
            batting_team: innings.batting_team().to_string(),
            bowling_team: innings.bowling_team().to_string(),
            runs: innings.total_runs(),
            wickets: innings.wickets(),
            overs: overs_notation(innings.legal_balls()),
            extras: innings.extras(),
            target: innings.target(),
            runs_required: innings.runs_required(),
            striker: name(innings.striker()),
            non_striker: name(innings.non_striker()),
            bowler: name(innings.bowler()),
            this_over: innings.current_over().into_iter().cloned().collect(),
            next: innings.next_action(),
            eligible_bowlers: eligible_bowlers(innings),
            joker: innings.joker().map(|joker| JokerStatus {
                name: joker.name.clone(),
                balls_bowled: innings.joker_balls(innings.innings_number()),
                can_bat: innings.joker_can_bat(),
                can_bowl: innings.joker_can_bowl(),
            }),
            batting: innings.batting_card(),
            bowling: innings.bowling_card(),
            first_innings: innings.first_innings().cloned(),
            result: innings.record().cloned(),
        }
    }
}

fn eligible_bowlers(innings: &Innings) -> Vec<String> {
    if innings.next_action() != NextAction::SelectBowler {
        return Vec::new();
    }
    innings
        .eligible_bowlers()
        .into_iter()
        .filter_map(|(id, verdict)| {
            let player = innings.player(id)?;
            match verdict {
                Verdict::Eligible => Some(player.name.clone()),
                Verdict::EligibleWithOverride => Some(format!("{} (over cap)", player.name)),
                Verdict::Ineligible(_) => None,
            }
        })
        .collect()
}

pub fn render_scoreboard(innings: &Innings, format: OutputFormat) -> Result<String, CreaseError> {
    let board = Scoreboard::from_innings(innings);
    match format {
        OutputFormat::Json => json::to_json(&board).map_err(CreaseError::Json),
        OutputFormat::Md => Ok(md::scoreboard_markdown(&board)),
    }
}

pub fn render_record(record: &MatchRecord, format: OutputFormat) -> Result<String, CreaseError> {
    match format {
        OutputFormat::Json => json::to_json(record).map_err(CreaseError::Json),
        OutputFormat::Md => Ok(md::record_markdown(record)),
    }
}

pub fn render_history(records: &[MatchRecord], format: OutputFormat) -> Result<String, CreaseError> {
    match format {
        OutputFormat::Json => json::to_json(&records).map_err(CreaseError::Json),
        OutputFormat::Md => Ok(md::history_markdown(records)),
    }
}
