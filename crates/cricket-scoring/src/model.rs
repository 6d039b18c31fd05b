//! Match data model
//!
//! Field names serialize in camelCase so a persisted match reads back
//! identically across reloads.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ball::BallEvent;
use crate::error::{ConfigError, StateError};

/// Legal deliveries in one over
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings
pub const MAX_WICKETS: u32 = 10;

/// Longest match the setup screen offers (overs per innings)
pub const MAX_OVERS: u32 = 20;

/// Most runs a single delivery can add off the bat (five plus overthrows)
pub const MAX_RUNS_PER_BALL: u32 = 7;

/// How a wide or no-ball is treated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Counts as a legal delivery, adds one run.
    Run,
    /// Adds one run and must be bowled again.
    Reball,
    /// Adds one run and must be bowled again. Same behavior as `Reball`.
    Both,
}

impl ExtraPolicy {
    /// Whether a delivery under this policy counts toward the over
    pub fn is_legal_delivery(self) -> bool {
        matches!(self, ExtraPolicy::Run)
    }
}

/// Match setup, fixed once the match starts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub total_overs: u32,
    pub wide_rule: ExtraPolicy,
    pub no_ball_rule: ExtraPolicy,
    /// Bats first
    pub team_one_name: String,
    /// Bowls first
    pub team_two_name: String,
    pub team_one_players: Vec<String>,
    pub team_two_players: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            total_overs: 5,
            wide_rule: ExtraPolicy::Both,
            no_ball_rule: ExtraPolicy::Both,
            team_one_name: String::new(),
            team_two_name: String::new(),
            team_one_players: Vec::new(),
            team_two_players: Vec::new(),
        }
    }
}

impl MatchConfig {
    /// Check the config can start a match
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_overs == 0 || self.total_overs > MAX_OVERS {
            return Err(ConfigError::InvalidOvers { found: self.total_overs, max: MAX_OVERS });
        }
        if self.team_one_players.is_empty() {
            return Err(ConfigError::EmptyRoster { team: self.team_one_name.clone() });
        }
        if self.team_two_players.is_empty() {
            return Err(ConfigError::EmptyRoster { team: self.team_two_name.clone() });
        }
        check_unique(&self.team_one_name, &self.team_one_players)?;
        check_unique(&self.team_two_name, &self.team_two_players)?;
        Ok(())
    }

    /// Trim names and fill in default team names.
    ///
    /// Blank player names are dropped.
    pub fn normalized(mut self) -> Self {
        self.team_one_name = default_if_blank(&self.team_one_name, "Team A");
        self.team_two_name = default_if_blank(&self.team_two_name, "Team B");
        self.team_one_players = clean_roster(self.team_one_players);
        self.team_two_players = clean_roster(self.team_two_players);
        self
    }

    /// Legal deliveries allowed per innings
    pub fn max_legal_balls(&self) -> u32 {
        self.total_overs * BALLS_PER_OVER
    }
}

fn default_if_blank(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stats are keyed by name, so a name may appear once per roster
fn check_unique(team: &str, players: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in players {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicatePlayer { team: team.to_string(), name: name.clone() });
        }
    }
    Ok(())
}

fn clean_roster(players: Vec<String>) -> Vec<String> {
    players
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Which innings is being played
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InningsNumber {
    First,
    Second,
}

impl From<InningsNumber> for u8 {
    fn from(n: InningsNumber) -> u8 {
        match n {
            InningsNumber::First => 1,
            InningsNumber::Second => 2,
        }
    }
}

impl TryFrom<u8> for InningsNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InningsNumber::First),
            2 => Ok(InningsNumber::Second),
            other => Err(format!("innings must be 1 or 2, got {}", other)),
        }
    }
}

/// Match lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    InProgress,
    Completed,
}

/// An active position that must be filled before a ball can be bowled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Striker,
    NonStriker,
    Bowler,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Striker => write!(f, "striker"),
            Role::NonStriker => write!(f, "non-striker"),
            Role::Bowler => write!(f, "bowler"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
}

/// One batter's figures in an innings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStat {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Bowler on when this batter was dismissed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_by: Option<String>,
}

impl BattingStat {
    pub fn is_out(&self) -> bool {
        self.out_by.is_some()
    }

    /// Runs per hundred balls faced
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f64 / self.balls as f64 * 100.0
    }
}

/// One bowler's figures in an innings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingStat {
    /// Legal deliveries bowled
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
}

impl BowlingStat {
    /// Overs bowled, e.g. `"3.2"`
    pub fn overs(&self) -> String {
        format_overs(self.balls)
    }

    /// Runs conceded per over
    pub fn economy(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs_conceded as f64 / self.balls as f64 * BALLS_PER_OVER as f64
    }
}

/// Render a legal ball count as overs: 7 balls is `"1.1"`
pub fn format_overs(balls: u32) -> String {
    format!("{}.{}", balls / BALLS_PER_OVER, balls % BALLS_PER_OVER)
}

/// State of one innings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsData {
    pub batting_team: String,
    pub bowling_team: String,
    pub total_runs: u32,
    pub wickets: u32,
    /// Legal deliveries only
    pub balls_bowled: u32,
    /// Every delivery, reballs included
    pub history: Vec<BallEvent>,
    pub extras: Extras,
    pub batting_stats: BTreeMap<String, BattingStat>,
    pub bowling_stats: BTreeMap<String, BowlingStat>,
    pub striker: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: Option<String>,
    /// Bowler of the last completed over
    #[serde(default)]
    pub previous_bowler: Option<String>,
}

impl InningsData {
    pub fn new(batting_team: impl Into<String>, bowling_team: impl Into<String>) -> Self {
        Self {
            batting_team: batting_team.into(),
            bowling_team: bowling_team.into(),
            total_runs: 0,
            wickets: 0,
            balls_bowled: 0,
            history: Vec::new(),
            extras: Extras::default(),
            batting_stats: BTreeMap::new(),
            bowling_stats: BTreeMap::new(),
            striker: None,
            non_striker: None,
            bowler: None,
            previous_bowler: None,
        }
    }

    /// Player currently filling `role`
    pub fn active(&self, role: Role) -> Option<&str> {
        match role {
            Role::Striker => self.striker.as_deref(),
            Role::NonStriker => self.non_striker.as_deref(),
            Role::Bowler => self.bowler.as_deref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Striker => &mut self.striker,
            Role::NonStriker => &mut self.non_striker,
            Role::Bowler => &mut self.bowler,
        }
    }

    /// Roles still waiting for a player, in selection order
    pub fn missing_roles(&self) -> Vec<Role> {
        [Role::Striker, Role::NonStriker, Role::Bowler]
            .into_iter()
            .filter(|role| self.active(*role).is_none())
            .collect()
    }

    pub fn is_dismissed(&self, name: &str) -> bool {
        self.batting_stats.get(name).map_or(false, BattingStat::is_out)
    }

    /// At either batting end
    pub fn is_batting(&self, name: &str) -> bool {
        self.striker.as_deref() == Some(name) || self.non_striker.as_deref() == Some(name)
    }

    pub fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    /// Legal balls remaining given the innings length
    pub fn balls_remaining(&self, config: &MatchConfig) -> u32 {
        config.max_legal_balls().saturating_sub(self.balls_bowled)
    }
}

/// A match in progress or completed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub current_innings: InningsNumber,
    pub status: MatchStatus,
    pub config: MatchConfig,
    pub innings_one: InningsData,
    pub innings_two: Option<InningsData>,
}

impl Match {
    pub fn innings(&self, number: InningsNumber) -> Option<&InningsData> {
        match number {
            InningsNumber::First => Some(&self.innings_one),
            InningsNumber::Second => self.innings_two.as_ref(),
        }
    }

    /// The innings being played (or last played, once completed)
    pub fn current(&self) -> &InningsData {
        match self.current_innings {
            InningsNumber::First => &self.innings_one,
            InningsNumber::Second => self.innings_two.as_ref().unwrap_or(&self.innings_one),
        }
    }

    pub(crate) fn current_mut(&mut self) -> &mut InningsData {
        match self.current_innings {
            InningsNumber::First => &mut self.innings_one,
            InningsNumber::Second => self.innings_two.as_mut().unwrap_or(&mut self.innings_one),
        }
    }

    /// Runs the second innings must reach to win
    pub fn target(&self) -> Option<u32> {
        match self.current_innings {
            InningsNumber::First => None,
            InningsNumber::Second => Some(self.innings_one.total_runs + 1),
        }
    }

    /// Roster of the side batting in the current innings
    pub fn batting_roster(&self) -> &[String] {
        match self.current_innings {
            InningsNumber::First => &self.config.team_one_players,
            InningsNumber::Second => &self.config.team_two_players,
        }
    }

    /// Roster of the side bowling in the current innings
    pub fn bowling_roster(&self) -> &[String] {
        match self.current_innings {
            InningsNumber::First => &self.config.team_two_players,
            InningsNumber::Second => &self.config.team_one_players,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Check a deserialized match against the data model invariants
    pub fn validate(&self) -> Result<(), StateError> {
        self.config.validate()?;

        let on_second = self.current_innings == InningsNumber::Second;
        if on_second != self.innings_two.is_some() {
            return Err(StateError::InningsMismatch { current: self.current_innings.into() });
        }

        let max = self.config.max_legal_balls();
        let all = [
            (InningsNumber::First, Some(&self.innings_one)),
            (InningsNumber::Second, self.innings_two.as_ref()),
        ];
        for (number, innings) in all {
            let Some(innings) = innings else { continue };
            let n: u8 = number.into();
            if innings.wickets > MAX_WICKETS {
                return Err(StateError::TooManyWickets { innings: n, wickets: innings.wickets });
            }
            if innings.balls_bowled > max {
                return Err(StateError::TooManyBalls { innings: n, balls: innings.balls_bowled, max });
            }
            let legal = innings.history.iter().filter(|e| e.legal).count();
            if legal != innings.balls_bowled as usize {
                return Err(StateError::HistoryMismatch { innings: n, balls: innings.balls_bowled });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig {
            team_one_name: "Lions".into(),
            team_two_name: "Tigers".into(),
            team_one_players: vec!["A".into(), "B".into()],
            team_two_players: vec!["X".into(), "Y".into()],
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_policy_legality() {
        assert!(ExtraPolicy::Run.is_legal_delivery());
        assert!(!ExtraPolicy::Reball.is_legal_delivery());
        assert!(!ExtraPolicy::Both.is_legal_delivery());
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());

        let cfg = MatchConfig { total_overs: 0, ..config() };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidOvers { found: 0, max: MAX_OVERS }));

        let cfg = MatchConfig { total_overs: 21, ..config() };
        assert!(cfg.validate().is_err());

        let cfg = MatchConfig { team_two_players: vec![], ..config() };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyRoster { team: "Tigers".into() }));

        let cfg = MatchConfig { team_one_players: vec!["A".into(), "B".into(), "A".into()], ..config() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicatePlayer { team: "Lions".into(), name: "A".into() })
        );
    }

    #[test]
    fn test_shared_player_across_teams_allowed() {
        let cfg = MatchConfig {
            team_one_players: vec!["A".into(), "Sam".into()],
            team_two_players: vec!["X".into(), "Sam".into()],
            ..config()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_normalized_fills_defaults() {
        let cfg = MatchConfig {
            team_one_name: "  ".into(),
            team_two_name: " Tigers ".into(),
            team_one_players: vec![" A ".into(), "".into(), "B".into()],
            ..config()
        }
        .normalized();

        assert_eq!(cfg.team_one_name, "Team A");
        assert_eq!(cfg.team_two_name, "Tigers");
        assert_eq!(cfg.team_one_players, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_format_overs() {
        assert_eq!(format_overs(0), "0.0");
        assert_eq!(format_overs(7), "1.1");
        assert_eq!(format_overs(12), "2.0");
    }

    #[test]
    fn test_stat_rates() {
        let bat = BattingStat { runs: 30, balls: 20, ..Default::default() };
        assert!((bat.strike_rate() - 150.0).abs() < 1e-9);
        assert_eq!(BattingStat::default().strike_rate(), 0.0);

        let bowl = BowlingStat { balls: 9, runs_conceded: 12, wickets: 1 };
        assert_eq!(bowl.overs(), "1.3");
        assert!((bowl.economy() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_roles() {
        let mut innings = InningsData::new("Lions", "Tigers");
        assert_eq!(innings.missing_roles(), vec![Role::Striker, Role::NonStriker, Role::Bowler]);

        innings.non_striker = Some("B".into());
        assert_eq!(innings.missing_roles(), vec![Role::Striker, Role::Bowler]);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(config()).unwrap();
        assert_eq!(json["totalOvers"], 5);
        assert_eq!(json["wideRule"], "both");
        assert_eq!(json["teamOnePlayers"][0], "A");

        assert_eq!(serde_json::to_value(InningsNumber::Second).unwrap(), 2);
        assert!(serde_json::from_str::<InningsNumber>("3").is_err());
        assert_eq!(serde_json::to_value(MatchStatus::InProgress).unwrap(), "in-progress");
    }
}
