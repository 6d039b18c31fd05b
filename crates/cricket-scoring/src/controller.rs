//! Innings and match control
//!
//! Gates ball recording on player assignment and live-innings checks,
//! delegates to the resolver, and performs the explicit innings/match
//! transitions. Reaching an end condition only stops scoring; moving to the
//! next innings is always the scorer's call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ball::BallRequest;
use crate::error::ScoringError;
use crate::model::{
    InningsData, InningsNumber, Match, MatchConfig, MatchStatus, Role, MAX_RUNS_PER_BALL,
    MAX_WICKETS,
};
use crate::resolver::resolve_ball;

/// Why the current innings accepts no more balls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndCondition {
    TargetReached,
    AllOut,
    OversExhausted,
}

impl EndCondition {
    /// Serialized name, as the page receives it
    pub fn as_str(self) -> &'static str {
        match self {
            EndCondition::TargetReached => "target-reached",
            EndCondition::AllOut => "all-out",
            EndCondition::OversExhausted => "overs-exhausted",
        }
    }
}

impl fmt::Display for EndCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndCondition::TargetReached => write!(f, "target reached"),
            EndCondition::AllOut => write!(f, "all out"),
            EndCondition::OversExhausted => write!(f, "overs exhausted"),
        }
    }
}

impl Match {
    /// Set up a new match with the first innings ready for player selection
    pub fn start(config: MatchConfig) -> Result<Self, ScoringError> {
        let config = config.normalized();
        config.validate()?;

        let innings_one = InningsData::new(&config.team_one_name, &config.team_two_name);
        log::info!(
            "match started: {} vs {}, {} overs",
            config.team_one_name,
            config.team_two_name,
            config.total_overs
        );

        Ok(Self {
            current_innings: InningsNumber::First,
            status: MatchStatus::InProgress,
            config,
            innings_one,
            innings_two: None,
        })
    }

    pub fn is_overs_exhausted(&self) -> bool {
        self.current().balls_bowled >= self.config.max_legal_balls()
    }

    /// Ten down, or a batting end is empty and nobody is left to fill it
    pub fn is_all_out(&self) -> bool {
        let innings = self.current();
        if innings.wickets >= MAX_WICKETS {
            return true;
        }
        let end_vacant = innings.striker.is_none() || innings.non_striker.is_none();
        end_vacant && self.eligible_batters().is_empty()
    }

    pub fn is_target_reached(&self) -> bool {
        match self.target() {
            Some(target) => self.current().total_runs >= target,
            None => false,
        }
    }

    /// First end condition that holds for the current innings
    pub fn end_condition(&self) -> Option<EndCondition> {
        if self.is_target_reached() {
            Some(EndCondition::TargetReached)
        } else if self.is_all_out() {
            Some(EndCondition::AllOut)
        } else if self.is_overs_exhausted() {
            Some(EndCondition::OversExhausted)
        } else {
            None
        }
    }

    /// Whether `record_ball` would accept a ball right now
    pub fn can_score(&self) -> bool {
        !self.is_completed()
            && self.end_condition().is_none()
            && self.current().missing_roles().is_empty()
    }

    /// Batters who can come in: not dismissed and not already at either end
    pub fn eligible_batters(&self) -> Vec<String> {
        let innings = self.current();
        self.batting_roster()
            .iter()
            .filter(|name| !innings.is_dismissed(name) && !innings.is_batting(name))
            .cloned()
            .collect()
    }

    /// Bowlers who can take the next over: anyone but the last over's bowler
    pub fn eligible_bowlers(&self) -> Vec<String> {
        let innings = self.current();
        self.bowling_roster()
            .iter()
            .filter(|name| innings.previous_bowler.as_deref() != Some(name.as_str()))
            .cloned()
            .collect()
    }

    /// Record one delivery in the current innings
    pub fn record_ball(&mut self, request: &BallRequest) -> Result<(), ScoringError> {
        if self.is_completed() {
            return Err(ScoringError::MatchCompleted);
        }
        if let Some(condition) = self.end_condition() {
            return Err(ScoringError::InningsOver(condition));
        }
        let missing = self.current().missing_roles();
        if !missing.is_empty() {
            return Err(ScoringError::PlayersNotAssigned { missing });
        }
        let runs = request.effective_runs_off_bat();
        if runs > MAX_RUNS_PER_BALL {
            return Err(ScoringError::ImplausibleRuns { runs, max: MAX_RUNS_PER_BALL });
        }

        let next = resolve_ball(self.current(), &self.config, request);
        *self.current_mut() = next;

        if let Some(condition) = self.end_condition() {
            log::info!(
                "{} innings over ({}): {}/{}",
                self.current().batting_team,
                condition,
                self.current().total_runs,
                self.current().wickets
            );
        }
        Ok(())
    }

    /// Put a player into an active role for the current innings
    pub fn assign_player(&mut self, role: Role, name: &str) -> Result<(), ScoringError> {
        if self.is_completed() {
            return Err(ScoringError::MatchCompleted);
        }
        if self.current().active(role) == Some(name) {
            return Ok(());
        }

        match role {
            Role::Striker | Role::NonStriker => {
                if !self.batting_roster().iter().any(|p| p == name) {
                    return Err(ScoringError::UnknownPlayer {
                        name: name.to_string(),
                        team: self.current().batting_team.clone(),
                    });
                }
                let innings = self.current();
                if innings.is_dismissed(name) || innings.is_batting(name) {
                    return Err(ScoringError::PlayerUnavailable { name: name.to_string() });
                }
            }
            Role::Bowler => {
                if !self.bowling_roster().iter().any(|p| p == name) {
                    return Err(ScoringError::UnknownPlayer {
                        name: name.to_string(),
                        team: self.current().bowling_team.clone(),
                    });
                }
                if self.current().previous_bowler.as_deref() == Some(name) {
                    return Err(ScoringError::BowlerUnavailable { name: name.to_string() });
                }
            }
        }

        let innings = self.current_mut();
        *innings.slot_mut(role) = Some(name.to_string());
        match role {
            Role::Striker | Role::NonStriker => {
                innings.batting_stats.entry(name.to_string()).or_default();
            }
            Role::Bowler => {
                innings.bowling_stats.entry(name.to_string()).or_default();
            }
        }
        log::debug!("{} assigned as {}", name, role);
        Ok(())
    }

    /// Close the current innings, or the match after the second innings
    pub fn end_innings(&mut self) -> Result<(), ScoringError> {
        if self.is_completed() {
            return Err(ScoringError::MatchCompleted);
        }

        match self.current_innings {
            InningsNumber::First => {
                self.current_innings = InningsNumber::Second;
                if self.innings_two.is_none() {
                    self.innings_two = Some(InningsData::new(
                        &self.innings_one.bowling_team,
                        &self.innings_one.batting_team,
                    ));
                }
                log::info!(
                    "first innings closed at {}/{}, target {}",
                    self.innings_one.total_runs,
                    self.innings_one.wickets,
                    self.innings_one.total_runs + 1
                );
            }
            InningsNumber::Second => {
                self.status = MatchStatus::Completed;
                log::info!("match completed");
            }
        }
        Ok(())
    }
}
