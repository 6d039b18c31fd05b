//! Scoreboard figures, timeline grouping and match result

use serde::{Deserialize, Serialize};

use crate::ball::BallEvent;
use crate::model::{format_overs, InningsData, InningsNumber, Match, BALLS_PER_OVER, MAX_WICKETS};

/// Headline figures for one innings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    /// e.g. `"4.2"`
    pub overs: String,
    pub balls_remaining: u32,
    pub run_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_needed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_run_rate: Option<f64>,
}

/// Runs per six legal balls
pub fn run_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 / balls as f64 * BALLS_PER_OVER as f64
}

/// Scoreboard for either innings; `None` if it has not started
pub fn scoreboard(m: &Match, number: InningsNumber) -> Option<Scoreboard> {
    let innings = m.innings(number)?;
    let balls_remaining = innings.balls_remaining(&m.config);
    let target = match number {
        InningsNumber::First => None,
        InningsNumber::Second => Some(m.innings_one.total_runs + 1),
    };
    let runs_needed = target.map(|t| t.saturating_sub(innings.total_runs));
    let required_run_rate = match runs_needed {
        Some(needed) if needed > 0 && balls_remaining > 0 => Some(run_rate(needed, balls_remaining)),
        _ => None,
    };

    Some(Scoreboard {
        batting_team: innings.batting_team.clone(),
        bowling_team: innings.bowling_team.clone(),
        runs: innings.total_runs,
        wickets: innings.wickets,
        overs: format_overs(innings.balls_bowled),
        balls_remaining,
        run_rate: run_rate(innings.total_runs, innings.balls_bowled),
        target,
        runs_needed,
        required_run_rate,
    })
}

/// Deliveries grouped by over. Reballs stay in the over they were bowled in.
pub fn timeline(innings: &InningsData) -> Vec<Vec<BallEvent>> {
    let mut overs = Vec::new();
    let mut over = Vec::new();
    let mut legal = 0;

    for event in &innings.history {
        over.push(*event);
        if event.legal {
            legal += 1;
            if legal % BALLS_PER_OVER == 0 {
                overs.push(std::mem::take(&mut over));
            }
        }
    }
    if !over.is_empty() {
        overs.push(over);
    }
    overs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "count", rename_all = "lowercase")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MatchResult {
    Won { team: String, margin: Margin },
    Tied,
}

/// Result of a completed match; `None` while still in progress
pub fn match_result(m: &Match) -> Option<MatchResult> {
    if !m.is_completed() {
        return None;
    }

    let first = m.innings_one.total_runs;
    let (second, second_wickets) =
        m.innings_two.as_ref().map_or((0, 0), |i| (i.total_runs, i.wickets));

    let result = if first > second {
        MatchResult::Won {
            team: m.config.team_one_name.clone(),
            margin: Margin::Runs(first - second),
        }
    } else if second > first {
        let wickets_available = (m.config.team_two_players.len() as u32)
            .saturating_sub(1)
            .min(MAX_WICKETS);
        MatchResult::Won {
            team: m.config.team_two_name.clone(),
            margin: Margin::Wickets(wickets_available.saturating_sub(second_wickets)),
        }
    } else {
        MatchResult::Tied
    };
    Some(result)
}
