//! Ball resolution
//!
//! Computes the effect of exactly one delivery on an innings: runs, legality,
//! wickets, player figures, strike rotation and over completion. Knows nothing
//! of undo history or innings transitions. Callers check that all three
//! players are assigned and the innings is still live before resolving.

use crate::ball::{BallEvent, BallKind, BallRequest, WhoOut};
use crate::model::{InningsData, MatchConfig, BALLS_PER_OVER};

/// Resolve one delivery, returning the updated innings.
///
/// A dismissed batter's end is cleared wherever strike rotation left them.
pub fn resolve_ball(innings: &InningsData, config: &MatchConfig, request: &BallRequest) -> InningsData {
    let mut next = innings.clone();
    apply_ball(&mut next, config, request);
    next
}

/// Penalty runs and legality of a delivery under the match rules
fn delivery_terms(kind: BallKind, config: &MatchConfig) -> (u32, bool) {
    match kind {
        BallKind::Ordinary | BallKind::Wicket => (0, true),
        BallKind::Wide => (1, config.wide_rule.is_legal_delivery()),
        BallKind::NoBall => (1, config.no_ball_rule.is_legal_delivery()),
    }
}

fn apply_ball(innings: &mut InningsData, config: &MatchConfig, request: &BallRequest) {
    let runs_off_bat = request.effective_runs_off_bat();
    let wicket = request.takes_wicket();
    let (penalty, legal) = delivery_terms(request.kind, config);
    let total_runs = runs_off_bat + penalty;

    let striker = innings.striker.clone();
    let bowler = innings.bowler.clone();
    let dismissed = if wicket {
        match request.who_out {
            WhoOut::Striker => innings.striker.clone(),
            WhoOut::NonStriker => innings.non_striker.clone(),
        }
    } else {
        None
    };

    innings.total_runs += total_runs;
    if legal {
        innings.balls_bowled += 1;
    }
    match request.kind {
        BallKind::Wide => innings.extras.wides += 1,
        BallKind::NoBall => innings.extras.no_balls += 1,
        _ => {}
    }

    // A wide is never faced
    if request.kind != BallKind::Wide {
        if let Some(name) = &striker {
            let stat = innings.batting_stats.entry(name.clone()).or_default();
            stat.balls += 1;
            stat.runs += runs_off_bat;
            match runs_off_bat {
                4 => stat.fours += 1,
                6 => stat.sixes += 1,
                _ => {}
            }
        }
    }

    if wicket {
        innings.wickets += 1;
        if let Some(name) = &dismissed {
            let stat = innings.batting_stats.entry(name.clone()).or_default();
            stat.out_by = Some(bowler.clone().unwrap_or_default());
        }
    }

    if let Some(name) = &bowler {
        let stat = innings.bowling_stats.entry(name.clone()).or_default();
        stat.runs_conceded += total_runs;
        if legal {
            stat.balls += 1;
        }
        // Dismissals off extras credit the fielding side, not the bowler
        if wicket && !request.kind.is_extra() {
            stat.wickets += 1;
        }
    }

    innings.history.push(BallEvent { kind: request.kind, runs: runs_off_bat, wicket, legal });

    if runs_off_bat % 2 == 1 {
        innings.swap_strike();
    }

    if legal && innings.balls_bowled % BALLS_PER_OVER == 0 {
        innings.swap_strike();
        innings.previous_bowler = innings.bowler.take();
    }

    // The dismissed batter's end, wherever rotation left them
    if let Some(name) = dismissed {
        if innings.striker.as_deref() == Some(name.as_str()) {
            innings.striker = None;
        } else if innings.non_striker.as_deref() == Some(name.as_str()) {
            innings.non_striker = None;
        }
    }

    log::debug!(
        "resolved {} for {} runs: {}/{} after {} legal balls",
        innings.history.last().map(ToString::to_string).unwrap_or_default(),
        total_runs,
        innings.total_runs,
        innings.wickets,
        innings.balls_bowled,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtraPolicy;

    fn config(wide_rule: ExtraPolicy, no_ball_rule: ExtraPolicy) -> MatchConfig {
        MatchConfig {
            total_overs: 2,
            wide_rule,
            no_ball_rule,
            team_one_name: "Lions".into(),
            team_two_name: "Tigers".into(),
            team_one_players: vec!["A".into(), "B".into(), "C".into()],
            team_two_players: vec!["X".into(), "Y".into()],
        }
    }

    fn innings() -> InningsData {
        let mut innings = InningsData::new("Lions", "Tigers");
        innings.striker = Some("A".into());
        innings.non_striker = Some("B".into());
        innings.bowler = Some("X".into());
        innings
    }

    fn both() -> MatchConfig {
        config(ExtraPolicy::Both, ExtraPolicy::Both)
    }

    #[test]
    fn test_boundary_four() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::ordinary(4));

        assert_eq!(next.total_runs, 4);
        assert_eq!(next.balls_bowled, 1);
        let a = &next.batting_stats["A"];
        assert_eq!((a.runs, a.balls, a.fours, a.sixes), (4, 1, 1, 0));
        assert_eq!(next.striker.as_deref(), Some("A"));
        assert_eq!(next.bowling_stats["X"].runs_conceded, 4);
        assert_eq!(next.history[0].to_string(), "4");
    }

    #[test]
    fn test_input_untouched() {
        let before = innings();
        let _ = resolve_ball(&before, &both(), &BallRequest::ordinary(6));
        assert_eq!(before, innings());
    }

    #[test]
    fn test_odd_runs_rotate_strike() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::ordinary(3));
        assert_eq!(next.striker.as_deref(), Some("B"));
        assert_eq!(next.non_striker.as_deref(), Some("A"));
        assert_eq!(next.batting_stats["A"].runs, 3);
    }

    #[test]
    fn test_wide_reball() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::wide(0));

        assert_eq!(next.total_runs, 1);
        assert_eq!(next.balls_bowled, 0);
        assert_eq!(next.extras.wides, 1);
        assert!(next.batting_stats.get("A").is_none());
        assert_eq!(next.bowling_stats["X"].runs_conceded, 1);
        assert_eq!(next.bowling_stats["X"].balls, 0);
        assert!(!next.history[0].legal);
        assert_eq!(next.history[0].to_string(), "WD");
    }

    #[test]
    fn test_wide_run_policy_is_legal() {
        let cfg = config(ExtraPolicy::Run, ExtraPolicy::Both);
        let next = resolve_ball(&innings(), &cfg, &BallRequest::wide(0));
        assert_eq!(next.balls_bowled, 1);
        assert_eq!(next.bowling_stats["X"].balls, 1);

        let cfg = config(ExtraPolicy::Reball, ExtraPolicy::Both);
        let next = resolve_ball(&innings(), &cfg, &BallRequest::wide(0));
        assert_eq!(next.balls_bowled, 0);
    }

    #[test]
    fn test_wide_with_runs_rotates() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::wide(1));
        assert_eq!(next.total_runs, 2);
        assert_eq!(next.striker.as_deref(), Some("B"));
        assert_eq!(next.history[0].to_string(), "WD+1");
    }

    #[test]
    fn test_no_ball_credits_batter() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::no_ball(4));

        assert_eq!(next.total_runs, 5);
        assert_eq!(next.balls_bowled, 0);
        assert_eq!(next.extras.no_balls, 1);
        let a = &next.batting_stats["A"];
        assert_eq!((a.runs, a.balls, a.fours), (4, 1, 1));
        assert_eq!(next.bowling_stats["X"].runs_conceded, 5);
        assert_eq!(next.history[0].to_string(), "NB+4");
    }

    #[test]
    fn test_pure_wicket() {
        let next = resolve_ball(&innings(), &both(), &BallRequest::wicket());

        assert_eq!(next.wickets, 1);
        assert_eq!(next.total_runs, 0);
        assert_eq!(next.balls_bowled, 1);
        assert_eq!(next.batting_stats["A"].balls, 1);
        assert_eq!(next.batting_stats["A"].out_by.as_deref(), Some("X"));
        assert_eq!(next.bowling_stats["X"].wickets, 1);
        assert_eq!(next.striker, None);
        assert_eq!(next.non_striker.as_deref(), Some("B"));
        assert_eq!(next.history[0].to_string(), "W");
    }

    #[test]
    fn test_wicket_after_odd_run_clears_dismissed_end() {
        let req = BallRequest::ordinary(1).out(WhoOut::Striker);
        let next = resolve_ball(&innings(), &both(), &req);

        assert_eq!(next.total_runs, 1);
        assert_eq!(next.wickets, 1);
        assert!(next.batting_stats["A"].is_out());
        assert_eq!(next.batting_stats["A"].balls, 1);
        assert_eq!(next.striker.as_deref(), Some("B"));
        assert_eq!(next.non_striker, None);
        assert_eq!(next.history[0].to_string(), "W");
    }

    #[test]
    fn test_non_striker_run_out() {
        let req = BallRequest::ordinary(0).out(WhoOut::NonStriker);
        let next = resolve_ball(&innings(), &both(), &req);

        assert!(next.batting_stats["B"].is_out());
        assert!(!next.batting_stats["A"].is_out());
        assert_eq!(next.striker.as_deref(), Some("A"));
        assert_eq!(next.non_striker, None);
    }

    #[test]
    fn test_wicket_on_extra_not_credited_to_bowler() {
        let req = BallRequest::wide(1).out(WhoOut::Striker);
        let next = resolve_ball(&innings(), &both(), &req);

        assert_eq!(next.wickets, 1);
        assert_eq!(next.bowling_stats["X"].wickets, 0);
        assert_eq!(next.bowling_stats["X"].runs_conceded, 2);
        assert_eq!(next.history[0].to_string(), "WD+1+W");

        let req = BallRequest::no_ball(0).out(WhoOut::NonStriker);
        let next = resolve_ball(&innings(), &both(), &req);
        assert_eq!(next.bowling_stats["X"].wickets, 0);
        assert_eq!(next.history[0].to_string(), "NB+W");
    }

    #[test]
    fn test_over_completion() {
        let cfg = both();
        let mut state = innings();
        for _ in 0..5 {
            state = resolve_ball(&state, &cfg, &BallRequest::ordinary(0));
        }
        assert_eq!(state.bowler.as_deref(), Some("X"));

        state = resolve_ball(&state, &cfg, &BallRequest::ordinary(0));
        assert_eq!(state.balls_bowled, 6);
        assert_eq!(state.striker.as_deref(), Some("B"));
        assert_eq!(state.non_striker.as_deref(), Some("A"));
        assert_eq!(state.bowler, None);
        assert_eq!(state.previous_bowler.as_deref(), Some("X"));
        assert_eq!(state.bowling_stats["X"].overs(), "1.0");
    }

    #[test]
    fn test_single_off_last_ball_keeps_strike() {
        let cfg = both();
        let mut state = innings();
        for _ in 0..5 {
            state = resolve_ball(&state, &cfg, &BallRequest::ordinary(0));
        }
        state = resolve_ball(&state, &cfg, &BallRequest::ordinary(1));
        // rotated by the run, then back by the change of ends
        assert_eq!(state.striker.as_deref(), Some("A"));
    }

    #[test]
    fn test_reball_does_not_complete_over() {
        let cfg = both();
        let mut state = innings();
        for _ in 0..5 {
            state = resolve_ball(&state, &cfg, &BallRequest::ordinary(0));
        }
        state = resolve_ball(&state, &cfg, &BallRequest::wide(0));
        assert_eq!(state.balls_bowled, 5);
        assert_eq!(state.bowler.as_deref(), Some("X"));
        assert_eq!(state.history.len(), 6);
    }
}
