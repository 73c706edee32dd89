//! The innings state machine.
//!
//! Players live in one arena keyed by [`PlayerId`]; rosters and the
//! striker/non-striker/bowler slots only hold ids, so adding or removing the
//! joker never shifts anyone else. Every delivery pushes a full copy of the
//! mutable state onto a bounded history before it mutates anything, and every
//! operation validates first so a rejected action leaves no trace.

use crate::scoring::delivery::{DeliveryLedger, DeliveryRecord};
use crate::scoring::eligibility::{self, BowlerView, OverContext, Verdict};
use crate::scoring::extras::{additional_runs_parity, ExtraKind};
use crate::scoring::history::History;
use crate::scoring::result;
use crate::scoring::{check_runs, End, NextAction, Outcome, ScoringError, WicketKind};
use crate::types::config::MatchConfig;
use crate::types::player::{overs_notation, Player, PlayerId};
use crate::types::record::{InningsSummary, MatchRecord};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A team as supplied by the caller: a name and its players in batting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSheet {
    pub name: String,
    pub players: Vec<String>,
}

impl TeamSheet {
    pub fn new(name: impl Into<String>, players: &[&str]) -> Self {
        Self {
            name: name.into(),
            players: players.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Side {
    name: String,
    roster: Vec<PlayerId>,
}

impl Side {
    fn contains(&self, id: PlayerId) -> bool {
        self.roster.contains(&id)
    }

    fn remove(&mut self, id: PlayerId) {
        self.roster.retain(|member| *member != id);
    }
}

/// Players who left the crease or finished a spell, one entry per player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompletedLedger {
    batters: Vec<Player>,
    bowlers: Vec<Player>,
}

fn upsert(entries: &mut Vec<Player>, player: Player) {
    match entries.iter_mut().find(|entry| entry.id == player.id) {
        Some(entry) => *entry = player,
        None => entries.push(player),
    }
}

/// Everything an undo restores.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Live {
    innings: u8,
    players: BTreeMap<PlayerId, Player>,
    batting: Side,
    bowling: Side,
    striker: Option<PlayerId>,
    non_striker: Option<PlayerId>,
    bowler: Option<PlayerId>,
    wickets: u32,
    completed_overs: u32,
    balls_in_over: u32,
    extras: u32,
    previous_bowler: Option<PlayerId>,
    joker_balls: [u32; 2],
    joker_dismissed: bool,
    joker_mid_over_replacement: bool,
    completed: [CompletedLedger; 2],
}

fn enrol(
    names: &[String],
    players: &mut BTreeMap<PlayerId, Player>,
    next_id: &mut u32,
) -> Vec<PlayerId> {
    names
        .iter()
        .map(|name| {
            let id = PlayerId(*next_id);
            *next_id += 1;
            players.insert(id, Player::new(id, name.trim()));
            id
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Innings {
    config: MatchConfig,
    joker: Option<PlayerId>,
    live: Live,
    history: History<Live>,
    deliveries: DeliveryLedger,
    first_innings: Option<InningsSummary>,
    first_innings_deliveries: DeliveryLedger,
    record: Option<MatchRecord>,
}

impl Innings {
    pub fn new(
        config: MatchConfig,
        batting_first: TeamSheet,
        fielding_first: TeamSheet,
        joker: Option<String>,
    ) -> Self {
        let mut players = BTreeMap::new();
        let mut next_id = 1u32;
        let batting_roster = enrol(&batting_first.players, &mut players, &mut next_id);
        let bowling_roster = enrol(&fielding_first.players, &mut players, &mut next_id);
        let joker = joker.map(|name| {
            let id = PlayerId(next_id);
            players.insert(id, Player::joker(id, name.trim()));
            id
        });

        Self {
            config,
            joker,
            live: Live {
                innings: 1,
                players,
                batting: Side {
                    name: batting_first.name,
                    roster: batting_roster,
                },
                bowling: Side {
                    name: fielding_first.name,
                    roster: bowling_roster,
                },
                striker: None,
                non_striker: None,
                bowler: None,
                wickets: 0,
                completed_overs: 0,
                balls_in_over: 0,
                extras: 0,
                previous_bowler: None,
                joker_balls: [0, 0],
                joker_dismissed: false,
                joker_mid_over_replacement: false,
                completed: [CompletedLedger::default(), CompletedLedger::default()],
            },
            history: History::default(),
            deliveries: DeliveryLedger::new(),
            first_innings: None,
            first_innings_deliveries: DeliveryLedger::new(),
            record: None,
        }
    }

    // ---- queries -------------------------------------------------------

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn innings_number(&self) -> u8 {
        self.live.innings
    }

    pub fn batting_team(&self) -> &str {
        &self.live.batting.name
    }

    pub fn bowling_team(&self) -> &str {
        &self.live.bowling.name
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.live.players.get(&id)
    }

    /// Case-insensitive lookup across both teams and the joker.
    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        let wanted = name.trim();
        self.live
            .players
            .values()
            .find(|player| player.name.eq_ignore_ascii_case(wanted))
            .map(|player| player.id)
    }

    pub fn joker(&self) -> Option<&Player> {
        self.joker.and_then(|id| self.player(id))
    }

    pub fn batting_roster(&self) -> Vec<&Player> {
        self.roster_players(&self.live.batting)
    }

    pub fn bowling_roster(&self) -> Vec<&Player> {
        self.roster_players(&self.live.bowling)
    }

    fn roster_players<'a>(&'a self, side: &Side) -> Vec<&'a Player> {
        side.roster
            .iter()
            .filter_map(|id| self.live.players.get(id))
            .collect()
    }

    pub fn striker(&self) -> Option<&Player> {
        self.live.striker.and_then(|id| self.player(id))
    }

    pub fn non_striker(&self) -> Option<&Player> {
        self.live.non_striker.and_then(|id| self.player(id))
    }

    pub fn bowler(&self) -> Option<&Player> {
        self.live.bowler.and_then(|id| self.player(id))
    }

    pub fn previous_bowler(&self) -> Option<&Player> {
        self.live.previous_bowler.and_then(|id| self.player(id))
    }

    pub fn wickets(&self) -> u32 {
        self.live.wickets
    }

    pub fn completed_overs(&self) -> u32 {
        self.live.completed_overs
    }

    pub fn balls_in_over(&self) -> u32 {
        self.live.balls_in_over
    }

    pub fn legal_balls(&self) -> u32 {
        self.live.completed_overs * 6 + self.live.balls_in_over
    }

    pub fn extras(&self) -> u32 {
        self.live.extras
    }

    pub fn total_runs(&self) -> u32 {
        self.batting_card()
            .iter()
            .map(|player| player.batting.runs)
            .sum::<u32>()
            + self.live.extras
    }

    pub fn target(&self) -> Option<u32> {
        self.first_innings.as_ref().map(|first| first.runs + 1)
    }

    pub fn runs_required(&self) -> Option<u32> {
        self.target()
            .map(|target| target.saturating_sub(self.total_runs()))
    }

    pub fn joker_balls(&self, innings: u8) -> u32 {
        match innings {
            1 | 2 => self.live.joker_balls[usize::from(innings - 1)],
            _ => 0,
        }
    }

    pub fn joker_dismissed(&self) -> bool {
        self.live.joker_dismissed
    }

    pub fn mid_over_replacement_pending(&self) -> bool {
        self.live.joker_mid_over_replacement
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Deliveries of the over in progress.
    pub fn current_over(&self) -> Vec<&DeliveryRecord> {
        self.deliveries.over(self.live.completed_overs + 1)
    }

    pub fn deliveries(&self) -> &DeliveryLedger {
        &self.deliveries
    }

    pub fn first_innings(&self) -> Option<&InningsSummary> {
        self.first_innings.as_ref()
    }

    pub fn first_innings_deliveries(&self) -> &DeliveryLedger {
        &self.first_innings_deliveries
    }

    pub fn record(&self) -> Option<&MatchRecord> {
        self.record.as_ref()
    }

    /// Batters of this innings with any activity, including ones no longer on the roster.
    pub fn batting_card(&self) -> Vec<Player> {
        let at_crease = [self.live.striker, self.live.non_striker];
        result::performances(
            self.batting_roster(),
            &self.ledger().batters,
            |player| player.has_batted() || at_crease.contains(&Some(player.id)),
        )
    }

    pub fn bowling_card(&self) -> Vec<Player> {
        let bowler = self.live.bowler;
        result::performances(
            self.bowling_roster(),
            &self.ledger().bowlers,
            |player| player.has_bowled() || bowler == Some(player.id),
        )
    }

    pub fn available_batsmen(&self) -> u32 {
        let not_out = self
            .batting_roster()
            .iter()
            .filter(|player| !player.batting.is_out)
            .count() as u32;
        not_out + u32::from(self.joker_can_bat())
    }

    /// The joker never opens, never returns after being dismissed, and never
    /// bats while on the bowling side.
    pub fn joker_can_bat(&self) -> bool {
        let Some(joker) = self.joker else {
            return false;
        };
        self.live.wickets > 0
            && !self.live.joker_dismissed
            && !self.live.bowling.contains(joker)
            && !self.live.batting.contains(joker)
    }

    pub fn joker_can_bowl(&self) -> bool {
        let Some(joker) = self.joker else {
            return false;
        };
        !self.live.batting.contains(joker)
            && self.live.joker_balls[self.idx()] < self.config.joker_ball_cap()
    }

    /// Single-side: nobody left to bat. Otherwise one fewer wicket than the
    /// batting roster holds, counting the joker only once it has joined.
    pub fn is_all_out(&self) -> bool {
        if self.config.single_side_batting {
            self.available_batsmen() == 0
        } else {
            let roster = self.live.batting.roster.len() as u32;
            self.live.wickets >= roster.saturating_sub(1)
        }
    }

    pub fn is_innings_complete(&self) -> bool {
        if self.live.completed_overs >= self.config.total_overs {
            return true;
        }
        if let Some(first) = &self.first_innings {
            if self.live.innings == 2 && self.total_runs() > first.runs {
                return true;
            }
        }
        self.is_all_out()
    }

    pub fn next_action(&self) -> NextAction {
        if self.record.is_some() || (self.live.innings == 2 && self.is_innings_complete()) {
            return NextAction::MatchComplete;
        }
        if self.is_innings_complete() {
            return NextAction::InningsComplete;
        }
        if self.live.striker.is_none() {
            return NextAction::SelectBatter(End::Striker);
        }
        if self.live.non_striker.is_none() && self.needs_partner() {
            return NextAction::SelectBatter(End::NonStriker);
        }
        if self.live.bowler.is_none() {
            return NextAction::SelectBowler;
        }
        NextAction::Continue
    }

    /// Verdict for every bowler the scorer could pick right now.
    pub fn eligible_bowlers(&self) -> Vec<(PlayerId, Verdict)> {
        let pool = self.bowler_pool();
        eligibility::assess_pool(&self.over_context(&pool), &self.config)
    }

    // ---- selection -----------------------------------------------------

    pub fn select_striker(&mut self, id: PlayerId) -> Result<Outcome, ScoringError> {
        self.select_batter(id, End::Striker)
    }

    pub fn select_non_striker(&mut self, id: PlayerId) -> Result<Outcome, ScoringError> {
        self.select_batter(id, End::NonStriker)
    }

    fn select_batter(&mut self, id: PlayerId, end: End) -> Result<Outcome, ScoringError> {
        self.ensure_open()?;
        let (slot, other) = match end {
            End::Striker => (self.live.striker, self.live.non_striker),
            End::NonStriker => (self.live.non_striker, self.live.striker),
        };
        if slot == Some(id) {
            return Ok(self.outcome(false, None));
        }
        if other == Some(id) {
            return Err(ScoringError::IneligibleBatter(format!(
                "{} is already at the other end",
                self.name_of(id)
            )));
        }
        let player = self
            .player(id)
            .ok_or_else(|| ScoringError::PlayerNotFound(id.to_string()))?;
        let is_joker = Some(id) == self.joker;
        if is_joker {
            if !self.live.batting.contains(id) && !self.joker_can_bat() {
                return Err(ScoringError::IneligibleBatter(format!(
                    "joker {} cannot bat now",
                    player.name
                )));
            }
        } else if !self.live.batting.contains(id) {
            return Err(ScoringError::IneligibleBatter(format!(
                "{} is not on {}",
                player.name, self.live.batting.name
            )));
        }
        if player.batting.is_out {
            return Err(ScoringError::IneligibleBatter(format!(
                "{} is already out",
                player.name
            )));
        }
        if slot.is_some() && self.innings_started() {
            return Err(ScoringError::IneligibleBatter(format!(
                "{} end is already occupied",
                end.as_str()
            )));
        }

        if is_joker && !self.live.batting.contains(id) {
            self.live.batting.roster.push(id);
        }
        match end {
            End::Striker => self.live.striker = Some(id),
            End::NonStriker => self.live.non_striker = Some(id),
        }
        debug!(player = %self.name_of(id), end = end.as_str(), "batter selected");
        Ok(self.outcome(false, None))
    }

    pub fn select_bowler(&mut self, id: PlayerId) -> Result<Outcome, ScoringError> {
        self.ensure_open()?;
        let player = self
            .player(id)
            .ok_or_else(|| ScoringError::PlayerNotFound(id.to_string()))?;
        let is_joker = Some(id) == self.joker;
        if is_joker {
            if !self.live.bowling.contains(id) && !self.joker_can_bowl() {
                return Err(ScoringError::IneligibleBowler(format!(
                    "joker {} cannot bowl now",
                    player.name
                )));
            }
        } else if !self.live.bowling.contains(id) {
            return Err(ScoringError::IneligibleBowler(format!(
                "{} is not on {}",
                player.name, self.live.bowling.name
            )));
        }

        let pool = self.bowler_pool();
        let candidate = self.bowler_view(id);
        let verdict = eligibility::check(&candidate, &self.over_context(&pool), &self.config);
        if let Verdict::Ineligible(reason) = verdict {
            return Err(ScoringError::IneligibleBowler(reason));
        }
        if verdict == Verdict::EligibleWithOverride {
            warn!(bowler = %candidate.name, "no bowler can complete a full over; cap override applied");
        }

        if is_joker && !self.live.bowling.contains(id) {
            self.live.bowling.roster.push(id);
        }
        if self.live.bowler != Some(id) && self.live.balls_in_over > 0 {
            self.live.joker_mid_over_replacement = false;
        }
        self.live.bowler = Some(id);
        debug!(bowler = %candidate.name, "bowler selected");
        Ok(self.outcome(false, None))
    }

    pub fn swap_strike(&mut self) -> Result<Outcome, ScoringError> {
        self.ensure_open()?;
        self.swap_ends();
        Ok(self.outcome(false, None))
    }

    /// Takes the joker off the bowling side so it can bat. Leaving mid-over
    /// opens the bowler slot for a replacement who finishes the over.
    pub fn release_joker(&mut self) -> Result<Outcome, ScoringError> {
        self.ensure_open()?;
        let joker = match self.joker {
            Some(joker) if self.live.bowling.contains(joker) => joker,
            _ => return Err(ScoringError::JokerNotBowling),
        };
        if self.live.bowler == Some(joker) {
            self.freeze_bowler(joker);
            self.live.bowler = None;
            if self.live.balls_in_over > 0 {
                self.live.joker_mid_over_replacement = true;
            }
        }
        self.live.bowling.remove(joker);
        info!(joker = %self.name_of(joker), "joker released from bowling");
        Ok(self.outcome(false, None))
    }

    // ---- deliveries ----------------------------------------------------

    pub fn score_runs(&mut self, runs: u32) -> Result<Outcome, ScoringError> {
        check_runs(runs)?;
        let (striker, bowler) = self.ready_for_delivery()?;
        self.checkpoint();

        self.with_player(striker, |player| {
            player.batting.runs += runs;
            player.batting.balls_faced += 1;
            match runs {
                4 => player.batting.fours += 1,
                6 => player.batting.sixes += 1,
                _ => {}
            }
        });
        self.with_player(bowler, |player| {
            player.bowling.runs_conceded += runs;
            player.bowling.balls_bowled += 1;
        });
        self.count_joker_ball(bowler);
        self.log_delivery(runs.to_string(), runs == 4 || runs == 6);
        debug!(runs, "runs scored");

        if runs % 2 == 1 && !self.config.single_side_batting {
            self.swap_ends();
        }
        let over_completed = self.advance_ball();
        Ok(self.outcome(over_completed, None))
    }

    pub fn record_extra(&mut self, kind: ExtraKind, total_runs: u32) -> Result<Outcome, ScoringError> {
        check_runs(total_runs)?;
        let base = kind.base_runs(&self.config.extras);
        if total_runs < base {
            return Err(ScoringError::ExtraBelowBase {
                kind,
                base,
                given: total_runs,
            });
        }
        let (striker, bowler) = self.ready_for_delivery()?;
        self.checkpoint();

        let odd_running = additional_runs_parity(total_runs, base) && !self.config.single_side_batting;
        self.live.extras += total_runs;
        self.log_delivery(kind.label(total_runs), false);
        debug!(%kind, total_runs, "extra recorded");

        if kind.is_legal_delivery() {
            self.with_player(striker, |player| player.batting.balls_faced += 1);
            self.with_player(bowler, |player| player.bowling.balls_bowled += 1);
            self.count_joker_ball(bowler);
            let over_completed = self.advance_ball();
            if !over_completed && odd_running {
                self.swap_ends();
            }
            return Ok(self.outcome(over_completed, None));
        }

        self.with_player(bowler, |player| player.bowling.runs_conceded += total_runs);
        if kind == ExtraKind::NoBall {
            self.with_player(striker, |player| player.batting.balls_faced += 1);
        }
        if odd_running {
            self.swap_ends();
        }
        Ok(self.outcome(false, None))
    }

    pub fn record_wicket(&mut self, kind: WicketKind) -> Result<Outcome, ScoringError> {
        let (striker, bowler) = self.ready_for_delivery()?;
        self.checkpoint();

        self.live.wickets += 1;
        self.with_player(striker, |player| {
            player.batting.is_out = true;
            player.batting.balls_faced += 1;
        });
        self.freeze_batter(striker);
        self.with_player(bowler, |player| {
            player.bowling.wickets += 1;
            player.bowling.balls_bowled += 1;
        });
        self.count_joker_ball(bowler);
        self.log_delivery("W".to_string(), true);
        info!(
            batter = %self.name_of(striker),
            bowler = %self.name_of(bowler),
            ?kind,
            wickets = self.live.wickets,
            "wicket"
        );

        self.live.striker = None;
        self.retire_dismissed_joker(striker);
        let over_completed = self.advance_ball();
        self.fill_vacancy();
        Ok(self.outcome(over_completed, None))
    }

    /// The scorer's (player, end) call is authoritative even when it does not
    /// match where the slots say that player should be.
    pub fn record_run_out(
        &mut self,
        runs_completed: u32,
        dismissed: PlayerId,
        end: End,
    ) -> Result<Outcome, ScoringError> {
        check_runs(runs_completed)?;
        let (striker, bowler) = self.ready_for_delivery()?;
        let original_end = if dismissed == striker {
            End::Striker
        } else if self.live.non_striker == Some(dismissed) {
            End::NonStriker
        } else {
            let who = self
                .player(dismissed)
                .map_or_else(|| dismissed.to_string(), |player| player.name.clone());
            return Err(ScoringError::PlayerNotFound(format!(
                "{who} is not at the crease"
            )));
        };
        let survivor = match original_end {
            End::Striker => self.live.non_striker,
            End::NonStriker => Some(striker),
        };
        let crossed = runs_completed % 2 == 1 && !self.config.single_side_batting;
        let expected_end = match (original_end, crossed) {
            (End::Striker, true) => End::NonStriker,
            (End::NonStriker, true) => End::Striker,
            (end, false) => end,
        };
        let advisory = (expected_end != end).then(|| {
            format!(
                "{} recorded out at the {} end; expected the {} end after {} run(s), keeping the scorer's call",
                self.name_of(dismissed),
                end.as_str(),
                expected_end.as_str(),
                runs_completed
            )
        });
        self.checkpoint();

        self.with_player(striker, |player| {
            player.batting.runs += runs_completed;
            player.batting.balls_faced += 1;
        });
        self.with_player(bowler, |player| {
            player.bowling.runs_conceded += runs_completed;
            player.bowling.balls_bowled += 1;
        });
        self.count_joker_ball(bowler);
        self.live.wickets += 1;
        self.with_player(dismissed, |player| player.batting.is_out = true);
        self.freeze_batter(dismissed);
        self.log_delivery(format!("RO+{runs_completed}"), true);

        match end {
            End::Striker => {
                self.live.striker = None;
                self.live.non_striker = survivor;
            }
            End::NonStriker => {
                self.live.non_striker = None;
                self.live.striker = survivor;
            }
        }
        if let Some(note) = &advisory {
            warn!("{note}");
        }
        info!(
            batter = %self.name_of(dismissed),
            end = end.as_str(),
            runs_completed,
            wickets = self.live.wickets,
            "run out"
        );

        self.retire_dismissed_joker(dismissed);
        let over_completed = self.advance_ball();
        self.fill_vacancy();
        Ok(self.outcome(over_completed, advisory))
    }

    // ---- innings lifecycle ---------------------------------------------

    pub fn transition_to_second_innings(&mut self) -> Result<Outcome, ScoringError> {
        if self.live.innings != 1 {
            return Err(ScoringError::NotFirstInnings);
        }
        if !self.is_innings_complete() {
            return Err(ScoringError::InningsNotComplete);
        }

        let summary = self.summary();
        info!(
            team = %summary.batting_team,
            runs = summary.runs,
            wickets = summary.wickets,
            overs = %summary.overs,
            "first innings closed"
        );
        self.first_innings = Some(summary);
        self.first_innings_deliveries = std::mem::take(&mut self.deliveries);

        let live = &mut self.live;
        std::mem::swap(&mut live.batting, &mut live.bowling);
        if let Some(joker) = self.joker {
            live.batting.remove(joker);
            live.bowling.remove(joker);
        }
        live.players.values_mut().for_each(Player::reset_figures);
        live.innings = 2;
        live.striker = None;
        live.non_striker = None;
        live.bowler = None;
        live.wickets = 0;
        live.completed_overs = 0;
        live.balls_in_over = 0;
        live.extras = 0;
        live.previous_bowler = None;
        live.joker_dismissed = false;
        live.joker_mid_over_replacement = false;
        live.completed[1] = CompletedLedger::default();
        self.history.clear();

        Ok(self.outcome(false, None))
    }

    /// Builds the match record once; later calls return the same record.
    pub fn finalize(&mut self, played_at: DateTime<Utc>) -> Result<&MatchRecord, ScoringError> {
        if self.record.is_none() {
            if self.live.innings != 2 || !self.is_innings_complete() {
                return Err(ScoringError::InningsNotComplete);
            }
            let first = self
                .first_innings
                .clone()
                .ok_or(ScoringError::InningsNotComplete)?;
            let record = result::build_record(
                &self.config.format,
                self.config.total_overs,
                first,
                self.summary(),
                played_at,
            );
            info!(id = %record.id, result = %record.headline(), "match finalized");
            self.record = Some(record);
        }
        self.record.as_ref().ok_or(ScoringError::InningsNotComplete)
    }

    pub fn undo(&mut self) -> Result<Outcome, ScoringError> {
        if self.record.is_some() {
            return Err(ScoringError::MatchFinalized);
        }
        let snapshot = self.history.peek().ok_or(ScoringError::NothingToUndo)?;
        let crosses_innings = snapshot.innings < self.live.innings;
        let at_second_innings_start =
            snapshot.innings == 2 && snapshot.completed_overs == 0 && snapshot.balls_in_over == 0;
        if crosses_innings || at_second_innings_start {
            return Err(ScoringError::UndoBoundary);
        }

        let snapshot = self.history.pop().ok_or(ScoringError::NothingToUndo)?;
        self.live = snapshot;
        let removed = self.deliveries.pop_if_in_over(self.live.completed_overs + 1);
        debug!(removed = ?removed.map(|record| record.label), "undo applied");
        Ok(self.outcome(false, None))
    }

    // ---- internals -----------------------------------------------------

    fn idx(&self) -> usize {
        usize::from(self.live.innings.saturating_sub(1)).min(1)
    }

    fn ledger(&self) -> &CompletedLedger {
        &self.live.completed[self.idx()]
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.player(id)
            .map_or_else(|| id.to_string(), |player| player.name.clone())
    }

    fn with_player(&mut self, id: PlayerId, update: impl FnOnce(&mut Player)) {
        if let Some(player) = self.live.players.get_mut(&id) {
            update(player);
        }
    }

    fn outcome(&self, over_completed: bool, advisory: Option<String>) -> Outcome {
        Outcome {
            next: self.next_action(),
            over_completed,
            advisory,
        }
    }

    fn innings_started(&self) -> bool {
        self.legal_balls() > 0 || !self.deliveries.is_empty()
    }

    fn ensure_open(&self) -> Result<(), ScoringError> {
        if self.record.is_some() {
            return Err(ScoringError::MatchFinalized);
        }
        if self.is_innings_complete() {
            return Err(ScoringError::InningsComplete);
        }
        Ok(())
    }

    fn ready_for_delivery(&self) -> Result<(PlayerId, PlayerId), ScoringError> {
        self.ensure_open()?;
        let striker = self.live.striker.ok_or(ScoringError::NoStriker)?;
        if self.live.non_striker.is_none() && self.needs_partner() {
            return Err(ScoringError::NoNonStriker);
        }
        let bowler = self.live.bowler.ok_or(ScoringError::NoBowler)?;
        Ok((striker, bowler))
    }

    /// In single-side mode a lone batter may carry on without a partner.
    fn needs_partner(&self) -> bool {
        if !self.config.single_side_batting {
            return true;
        }
        self.waiting_batters().next().is_some() || self.joker_can_bat()
    }

    /// Not-out roster batters who are not at the crease.
    fn waiting_batters(&self) -> impl Iterator<Item = &Player> + '_ {
        let at_crease = [self.live.striker, self.live.non_striker];
        self.batting_roster()
            .into_iter()
            .filter(move |player| !player.batting.is_out && !at_crease.contains(&Some(player.id)))
    }

    fn checkpoint(&mut self) {
        self.history.push(self.live.clone());
    }

    fn swap_ends(&mut self) {
        std::mem::swap(&mut self.live.striker, &mut self.live.non_striker);
    }

    fn count_joker_ball(&mut self, bowler: PlayerId) {
        if Some(bowler) == self.joker {
            let idx = self.idx();
            self.live.joker_balls[idx] += 1;
        }
    }

    fn log_delivery(&mut self, label: String, highlight: bool) {
        self.deliveries.push(DeliveryRecord {
            over: self.live.completed_overs + 1,
            ball: self.live.balls_in_over + 1,
            label,
            highlight,
        });
    }

    fn freeze_batter(&mut self, id: PlayerId) {
        if let Some(player) = self.player(id).cloned() {
            let idx = self.idx();
            upsert(&mut self.live.completed[idx].batters, player);
        }
    }

    fn freeze_bowler(&mut self, id: PlayerId) {
        if let Some(player) = self.player(id).cloned() {
            let idx = self.idx();
            upsert(&mut self.live.completed[idx].bowlers, player);
        }
    }

    fn retire_dismissed_joker(&mut self, dismissed: PlayerId) {
        if Some(dismissed) == self.joker {
            self.live.batting.remove(dismissed);
            self.live.joker_dismissed = true;
            info!(joker = %self.name_of(dismissed), "joker dismissed; unavailable for the rest of the innings");
        }
    }

    /// Counts a legal ball and closes the over on the sixth.
    fn advance_ball(&mut self) -> bool {
        self.live.balls_in_over += 1;
        if self.live.balls_in_over < 6 {
            return false;
        }
        self.complete_over();
        true
    }

    fn complete_over(&mut self) {
        self.live.completed_overs += 1;
        self.live.balls_in_over = 0;
        if let Some(bowler) = self.live.bowler.take() {
            self.freeze_bowler(bowler);
            self.live.previous_bowler = Some(bowler);
            info!(
                over = self.live.completed_overs,
                bowler = %self.name_of(bowler),
                score = %format!("{}/{}", self.total_runs(), self.live.wickets),
                "over completed"
            );
        }
        self.live.joker_mid_over_replacement = false;
        if !self.config.single_side_batting {
            self.swap_ends();
        }
    }

    /// After a dismissal: a lone batter in single-side mode takes strike
    /// without a prompt; anything else waits for the scorer's pick.
    fn fill_vacancy(&mut self) {
        if !self.config.single_side_batting || self.available_batsmen() != 1 {
            return;
        }
        let sole = self
            .live
            .striker
            .or(self.live.non_striker)
            .or_else(|| self.waiting_batters().next().map(|player| player.id));
        if let Some(sole) = sole {
            self.live.striker = Some(sole);
            self.live.non_striker = None;
            debug!(batter = %self.name_of(sole), "last batter continues alone");
        }
    }

    fn bowler_view(&self, id: PlayerId) -> BowlerView {
        let is_joker = Some(id) == self.joker;
        let player = self.player(id);
        BowlerView {
            id,
            name: player.map_or_else(|| id.to_string(), |player| player.name.clone()),
            is_joker,
            balls_bowled: if is_joker {
                self.live.joker_balls[self.idx()]
            } else {
                player.map_or(0, |player| player.bowling.balls_bowled)
            },
        }
    }

    fn bowler_pool(&self) -> Vec<BowlerView> {
        let mut pool = self
            .live
            .bowling
            .roster
            .iter()
            .map(|id| self.bowler_view(*id))
            .collect::<Vec<_>>();
        if let Some(joker) = self.joker {
            if !self.live.bowling.contains(joker) && self.joker_can_bowl() {
                pool.push(self.bowler_view(joker));
            }
        }
        pool
    }

    fn over_context<'a>(&self, pool: &'a [BowlerView]) -> OverContext<'a> {
        OverContext {
            balls_in_over: self.live.balls_in_over,
            current_bowler: self.live.bowler,
            previous_bowler: self.live.previous_bowler,
            mid_over_replacement: self.live.joker_mid_over_replacement,
            pool,
        }
    }

    fn summary(&self) -> InningsSummary {
        InningsSummary {
            batting_team: self.live.batting.name.clone(),
            bowling_team: self.live.bowling.name.clone(),
            runs: self.total_runs(),
            wickets: self.live.wickets,
            balls: self.legal_balls(),
            overs: overs_notation(self.legal_balls()),
            extras: self.live.extras,
            batting: self.batting_card(),
            bowling: self.bowling_card(),
        }
    }
}
