use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a player for the whole match. Names are display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingFigures {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingFigures {
    pub wickets: u32,
    pub runs_conceded: u32,
    pub balls_bowled: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_joker: bool,
    #[serde(default)]
    pub batting: BattingFigures,
    #[serde(default)]
    pub bowling: BowlingFigures,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_joker: false,
            batting: BattingFigures::default(),
            bowling: BowlingFigures::default(),
        }
    }

    pub fn joker(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            is_joker: true,
            ..Self::new(id, name)
        }
    }

    pub fn strike_rate(&self) -> f64 {
        if self.batting.balls_faced == 0 {
            return 0.0;
        }
        f64::from(self.batting.runs) / f64::from(self.batting.balls_faced) * 100.0
    }

    /// Overs in cricket notation: 13 balls is 2.1, not 2.1666.
    pub fn overs_bowled(&self) -> f64 {
        let balls = self.bowling.balls_bowled;
        f64::from(balls / 6) + f64::from(balls % 6) / 10.0
    }

    pub fn economy(&self) -> f64 {
        if self.bowling.balls_bowled == 0 {
            return 0.0;
        }
        f64::from(self.bowling.runs_conceded) / f64::from(self.bowling.balls_bowled) * 6.0
    }

    pub fn has_batted(&self) -> bool {
        self.batting.balls_faced > 0 || self.batting.runs > 0 || self.batting.is_out
    }

    pub fn has_bowled(&self) -> bool {
        self.bowling.balls_bowled > 0 || self.bowling.runs_conceded > 0
    }

    pub fn reset_figures(&mut self) {
        self.batting = BattingFigures::default();
        self.bowling = BowlingFigures::default();
    }
}

pub fn overs_notation(balls: u32) -> String {
    format!("{}.{}", balls / 6, balls % 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_rate_is_zero_without_balls_faced() {
        let player = Player::new(PlayerId(1), "Asha");
        assert_eq!(player.strike_rate(), 0.0);
    }

    #[test]
    fn strike_rate_scales_to_hundred_balls() {
        let mut player = Player::new(PlayerId(1), "Asha");
        player.batting.runs = 30;
        player.batting.balls_faced = 20;
        assert!((player.strike_rate() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn overs_bowled_uses_cricket_notation() {
        let mut player = Player::new(PlayerId(2), "Ben");
        player.bowling.balls_bowled = 13;
        assert!((player.overs_bowled() - 2.1).abs() < 1e-9);
        assert_eq!(overs_notation(13), "2.1");
        assert_eq!(overs_notation(12), "2.0");
    }

    #[test]
    fn economy_is_runs_per_six_balls() {
        let mut player = Player::new(PlayerId(2), "Ben");
        assert_eq!(player.economy(), 0.0);
        player.bowling.balls_bowled = 9;
        player.bowling.runs_conceded = 12;
        assert!((player.economy() - 8.0).abs() < 1e-9);
    }
}
