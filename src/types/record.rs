use crate::types::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frozen totals and cards of one innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    /// Legal balls bowled.
    pub balls: u32,
    pub overs: String,
    pub extras: u32,
    pub batting: Vec<Player>,
    pub bowling: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBatsman {
    pub name: String,
    pub team: String,
    pub runs: u32,
    pub balls_faced: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBowler {
    pub name: String,
    pub team: String,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub balls_bowled: u32,
    pub economy: f64,
}

/// The persisted result of a finished match. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub played_at: DateTime<Utc>,
    pub format: String,
    pub total_overs: u32,
    pub first_innings: InningsSummary,
    pub second_innings: InningsSummary,
    pub is_tie: bool,
    pub winner: Option<String>,
    pub margin: String,
    pub top_batsman: Option<TopBatsman>,
    pub top_bowler: Option<TopBowler>,
}

impl MatchRecord {
    pub fn headline(&self) -> String {
        match &self.winner {
            Some(winner) => format!("{winner} won {}", self.margin),
            None => format!("Match tied ({})", self.margin),
        }
    }
}
