//! Ball requests and recorded ball events

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of delivery the scorer pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BallKind {
    Ordinary,
    Wide,
    NoBall,
    /// A dismissal with no runs
    Wicket,
}

impl BallKind {
    /// Wides and no-balls
    pub fn is_extra(self) -> bool {
        matches!(self, BallKind::Wide | BallKind::NoBall)
    }
}

/// Which batter was dismissed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhoOut {
    #[default]
    Striker,
    NonStriker,
}

/// One ball as entered by the scorer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallRequest {
    pub kind: BallKind,
    /// Runs taken while the ball was live (for extras, on top of the penalty run)
    pub runs_off_bat: u32,
    pub is_wicket: bool,
    #[serde(default)]
    pub who_out: WhoOut,
}

impl BallRequest {
    pub fn ordinary(runs_off_bat: u32) -> Self {
        Self { kind: BallKind::Ordinary, runs_off_bat, is_wicket: false, who_out: WhoOut::Striker }
    }

    pub fn wide(runs_off_bat: u32) -> Self {
        Self { kind: BallKind::Wide, runs_off_bat, is_wicket: false, who_out: WhoOut::Striker }
    }

    pub fn no_ball(runs_off_bat: u32) -> Self {
        Self { kind: BallKind::NoBall, runs_off_bat, is_wicket: false, who_out: WhoOut::Striker }
    }

    /// Striker dismissed, no runs
    pub fn wicket() -> Self {
        Self { kind: BallKind::Wicket, runs_off_bat: 0, is_wicket: true, who_out: WhoOut::Striker }
    }

    /// Mark the ball as also taking a wicket
    pub fn out(mut self, who_out: WhoOut) -> Self {
        self.is_wicket = true;
        self.who_out = who_out;
        self
    }

    /// Whether this ball dismisses a batter
    pub fn takes_wicket(&self) -> bool {
        self.is_wicket || self.kind == BallKind::Wicket
    }

    /// Pure wicket balls never carry runs
    pub fn effective_runs_off_bat(&self) -> u32 {
        match self.kind {
            BallKind::Wicket => 0,
            _ => self.runs_off_bat,
        }
    }
}

/// A recorded delivery, rendered to a timeline token only for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub kind: BallKind,
    /// Runs off the bat, excluding the extra's penalty run
    pub runs: u32,
    pub wicket: bool,
    /// Counted toward the over
    pub legal: bool,
}

impl BallEvent {
    /// Boundary hit off the bat (drives timeline colouring)
    pub fn is_boundary(&self) -> bool {
        !self.wicket && matches!(self.runs, 4 | 6)
    }
}

impl fmt::Display for BallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            BallKind::Ordinary if self.wicket => return write!(f, "W"),
            BallKind::Ordinary => return write!(f, "{}", self.runs),
            BallKind::Wicket => return write!(f, "W"),
            BallKind::Wide => "WD",
            BallKind::NoBall => "NB",
        };
        write!(f, "{}", prefix)?;
        if self.runs > 0 {
            write!(f, "+{}", self.runs)?;
        }
        if self.wicket {
            write!(f, "+W")?;
        }
        Ok(())
    }
}
