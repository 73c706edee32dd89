//! Who may bowl next. Pure decisions over a view of the innings; the state
//! machine builds the view and applies the verdict.

use crate::types::config::MatchConfig;
use crate::types::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BowlerView {
    pub id: PlayerId,
    pub name: String,
    pub is_joker: bool,
    /// For the joker this is the innings-level joker ledger, not the roster entry.
    pub balls_bowled: u32,
}

#[derive(Debug, Clone)]
pub struct OverContext<'a> {
    pub balls_in_over: u32,
    pub current_bowler: Option<PlayerId>,
    pub previous_bowler: Option<PlayerId>,
    pub mid_over_replacement: bool,
    /// Every bowler the scorer could pick from at this point.
    pub pool: &'a [BowlerView],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    /// Allowed to finish one over past the cap because nobody else can bowl a full one.
    EligibleWithOverride,
    Ineligible(String),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        !matches!(self, Self::Ineligible(_))
    }
}

fn ball_cap(candidate: &BowlerView, config: &MatchConfig) -> Option<u32> {
    if candidate.is_joker {
        Some(config.joker_ball_cap())
    } else {
        config.bowler_ball_cap()
    }
}

fn remaining_balls(candidate: &BowlerView, config: &MatchConfig) -> Option<u32> {
    ball_cap(candidate, config).map(|cap| cap.saturating_sub(candidate.balls_bowled))
}

fn can_bowl_full_over(candidate: &BowlerView, config: &MatchConfig) -> bool {
    remaining_balls(candidate, config).map_or(true, |left| left >= 6)
}

pub fn check(candidate: &BowlerView, ctx: &OverContext<'_>, config: &MatchConfig) -> Verdict {
    if ctx.current_bowler == Some(candidate.id) {
        return Verdict::Eligible;
    }

    if ctx.balls_in_over > 0 {
        if ctx.current_bowler.is_some() {
            return Verdict::Ineligible("cannot change bowler mid-over".to_string());
        }
        if !ctx.mid_over_replacement {
            return Verdict::Ineligible("over already started and no replacement is pending".to_string());
        }
        let needed = 6 - ctx.balls_in_over;
        return match remaining_balls(candidate, config) {
            Some(left) if left < needed => Verdict::Ineligible(format!(
                "{} has {left} ball(s) left under the cap, {needed} needed to finish the over",
                candidate.name
            )),
            _ => Verdict::Eligible,
        };
    }

    if ctx.previous_bowler == Some(candidate.id) {
        return Verdict::Ineligible(format!(
            "{} bowled the previous over",
            candidate.name
        ));
    }

    if can_bowl_full_over(candidate, config) {
        return Verdict::Eligible;
    }

    let left = remaining_balls(candidate, config).unwrap_or(0);
    if candidate.is_joker {
        return Verdict::Ineligible(format!(
            "joker {} has {left} ball(s) left under the joker cap",
            candidate.name
        ));
    }

    // A joker with a full over left counts as fresh even though it can
    // never take the override itself.
    let anyone_fresh = ctx
        .pool
        .iter()
        .filter(|other| ctx.previous_bowler != Some(other.id))
        .any(|other| can_bowl_full_over(other, config));
    if anyone_fresh {
        Verdict::Ineligible(format!(
            "{} has {left} ball(s) left under the cap",
            candidate.name
        ))
    } else {
        Verdict::EligibleWithOverride
    }
}

/// Verdicts for every bowler in the pool, in pool order.
pub fn assess_pool(ctx: &OverContext<'_>, config: &MatchConfig) -> Vec<(PlayerId, Verdict)> {
    ctx.pool
        .iter()
        .map(|candidate| (candidate.id, check(candidate, ctx, config)))
        .collect()
}
