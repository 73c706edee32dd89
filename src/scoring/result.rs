//! Winner, margin and top performers once the second innings is over.

use crate::types::player::{Player, PlayerId};
use crate::types::record::{InningsSummary, MatchRecord, TopBatsman, TopBowler};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

pub const TIE_MARGIN: &str = "Scores level";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Tie,
    ChasingWin { wickets: u32 },
    DefendingWin { runs: u32 },
}

pub fn decide(first_runs: u32, second_runs: u32, second_wickets: u32) -> Decision {
    match second_runs.cmp(&first_runs) {
        Ordering::Equal => Decision::Tie,
        Ordering::Greater => Decision::ChasingWin {
            wickets: 10u32.saturating_sub(second_wickets),
        },
        Ordering::Less => Decision::DefendingWin {
            runs: first_runs - second_runs,
        },
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("by 1 {unit}")
    } else {
        format!("by {count} {unit}s")
    }
}

impl Decision {
    pub fn margin(self) -> String {
        match self {
            Self::Tie => TIE_MARGIN.to_string(),
            Self::ChasingWin { wickets } => plural(wickets, "wicket"),
            Self::DefendingWin { runs } => plural(runs, "run"),
        }
    }
}

/// Live roster entries that did something, then ledger entries for players no
/// longer on the roster. Each player appears once.
pub fn performances<'a>(
    live: impl IntoIterator<Item = &'a Player>,
    ledger: &'a [Player],
    active: impl Fn(&Player) -> bool,
) -> Vec<Player> {
    let mut seen = HashSet::<PlayerId>::new();
    let mut out = Vec::new();
    for player in live.into_iter().chain(ledger.iter()) {
        if active(player) && seen.insert(player.id) {
            out.push(player.clone());
        }
    }
    out
}

pub fn top_batsman(innings: &[&InningsSummary]) -> Option<TopBatsman> {
    innings
        .iter()
        .flat_map(|summary| {
            summary
                .batting
                .iter()
                .map(move |player| (summary.batting_team.as_str(), player))
        })
        .fold(None::<(&str, &Player)>, |best, candidate| match best {
            None => Some(candidate),
            Some(current) => {
                let better = candidate.1.batting.runs > current.1.batting.runs
                    || (candidate.1.batting.runs == current.1.batting.runs
                        && candidate.1.batting.balls_faced < current.1.batting.balls_faced);
                Some(if better { candidate } else { current })
            }
        })
        .map(|(team, player)| TopBatsman {
            name: player.name.clone(),
            team: team.to_string(),
            runs: player.batting.runs,
            balls_faced: player.batting.balls_faced,
        })
}

pub fn top_bowler(innings: &[&InningsSummary]) -> Option<TopBowler> {
    innings
        .iter()
        .flat_map(|summary| {
            summary
                .bowling
                .iter()
                .map(move |player| (summary.bowling_team.as_str(), player))
        })
        .filter(|(_, player)| player.bowling.balls_bowled > 0)
        .fold(None::<(&str, &Player)>, |best, candidate| match best {
            None => Some(candidate),
            Some(current) => {
                let better = candidate.1.bowling.wickets > current.1.bowling.wickets
                    || (candidate.1.bowling.wickets == current.1.bowling.wickets
                        && candidate.1.economy() < current.1.economy());
                Some(if better { candidate } else { current })
            }
        })
        .map(|(team, player)| TopBowler {
            name: player.name.clone(),
            team: team.to_string(),
            wickets: player.bowling.wickets,
            runs_conceded: player.bowling.runs_conceded,
            balls_bowled: player.bowling.balls_bowled,
            economy: player.economy(),
        })
}

pub fn build_record(
    format: &str,
    total_overs: u32,
    first: InningsSummary,
    second: InningsSummary,
    played_at: DateTime<Utc>,
) -> MatchRecord {
    let decision = decide(first.runs, second.runs, second.wickets);
    let winner = match decision {
        Decision::Tie => None,
        Decision::ChasingWin { .. } => Some(second.batting_team.clone()),
        Decision::DefendingWin { .. } => Some(first.batting_team.clone()),
    };
    let top_batsman = top_batsman(&[&first, &second]);
    let top_bowler = top_bowler(&[&first, &second]);
    let id = format!(
        "{}-{}-vs-{}",
        played_at.format("%Y%m%dT%H%M%SZ"),
        slug(&first.batting_team),
        slug(&second.batting_team)
    );

    MatchRecord {
        id,
        played_at,
        format: format.to_string(),
        total_overs,
        first_innings: first,
        second_innings: second,
        is_tie: matches!(decision, Decision::Tie),
        winner,
        margin: decision.margin(),
        top_batsman,
        top_bowler,
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batter(id: u32, name: &str, runs: u32, balls: u32) -> Player {
        let mut player = Player::new(PlayerId(id), name);
        player.batting.runs = runs;
        player.batting.balls_faced = balls;
        player
    }

    fn bowler(id: u32, name: &str, wickets: u32, runs: u32, balls: u32) -> Player {
        let mut player = Player::new(PlayerId(id), name);
        player.bowling.wickets = wickets;
        player.bowling.runs_conceded = runs;
        player.bowling.balls_bowled = balls;
        player
    }

    fn summary(batting_team: &str, bowling_team: &str, runs: u32, wickets: u32) -> InningsSummary {
        InningsSummary {
            batting_team: batting_team.to_string(),
            bowling_team: bowling_team.to_string(),
            runs,
            wickets,
            balls: 60,
            overs: "10.0".to_string(),
            extras: 0,
            batting: Vec::new(),
            bowling: Vec::new(),
        }
    }

    #[test]
    fn equal_scores_are_a_tie() {
        assert_eq!(decide(120, 120, 4), Decision::Tie);
        assert_eq!(Decision::Tie.margin(), "Scores level");
    }

    #[test]
    fn chasing_side_wins_by_wickets_in_hand() {
        let decision = decide(100, 101, 3);
        assert_eq!(decision, Decision::ChasingWin { wickets: 7 });
        assert_eq!(decision.margin(), "by 7 wickets");
    }

    #[test]
    fn defending_side_wins_by_runs() {
        let decision = decide(100, 99, 10);
        assert_eq!(decision, Decision::DefendingWin { runs: 1 });
        assert_eq!(decision.margin(), "by 1 run");
    }

    #[test]
    fn tie_record_has_no_winner() {
        let record = build_record(
            "T20",
            20,
            summary("Falcons", "Owls", 120, 5),
            summary("Owls", "Falcons", 120, 7),
            Utc::now(),
        );
        assert!(record.is_tie);
        assert!(record.winner.is_none());
        assert_eq!(record.margin, "Scores level");
    }

    #[test]
    fn performances_prefer_live_entries_and_dedupe_by_id() {
        let live = vec![batter(1, "Asha", 12, 10), batter(2, "Ben", 0, 0)];
        let ledger = vec![batter(1, "Asha", 8, 6), batter(3, "Jo", 5, 4)];
        let cards = performances(&live, &ledger, Player::has_batted);
        let names = cards.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Asha", "Jo"]);
        assert_eq!(cards[0].batting.runs, 12);
    }

    #[test]
    fn top_batsman_spans_both_innings() {
        let mut first = summary("Falcons", "Owls", 50, 2);
        first.batting = vec![batter(1, "Asha", 30, 20)];
        let mut second = summary("Owls", "Falcons", 51, 1);
        second.batting = vec![batter(4, "Dev", 31, 25), batter(5, "Eli", 20, 10)];
        let top = top_batsman(&[&first, &second]).expect("someone batted");
        assert_eq!(top.name, "Dev");
        assert_eq!(top.team, "Owls");
    }

    #[test]
    fn top_bowler_breaks_ties_on_economy() {
        let mut first = summary("Falcons", "Owls", 50, 2);
        first.bowling = vec![bowler(4, "Dev", 2, 30, 12)];
        let mut second = summary("Owls", "Falcons", 40, 5);
        second.bowling = vec![bowler(1, "Asha", 2, 12, 12), bowler(2, "Ben", 0, 0, 0)];
        let top = top_bowler(&[&first, &second]).expect("someone bowled");
        assert_eq!(top.name, "Asha");
        assert_eq!(top.team, "Falcons");
        assert!((top.economy - 6.0).abs() < 1e-9);
    }

    #[test]
    fn top_bowler_ignores_players_without_legal_balls() {
        let mut first = summary("Falcons", "Owls", 50, 2);
        first.bowling = vec![bowler(4, "Dev", 0, 5, 0)];
        assert!(top_bowler(&[&first]).is_none());
    }
}
