//! Cricket Scoring
//!
//! Core logic for a live two-innings limited-overs cricket scorer.
//! This crate is compiled to:
//! - Native (for tests and tooling)
//! - WASM (for the browser scoring screen)

mod ball;
mod controller;
mod error;
mod history;
mod model;
mod resolver;
mod store;
mod summary;

#[cfg(feature = "wasm")]
mod wasm;

pub use ball::{BallEvent, BallKind, BallRequest, WhoOut};
pub use controller::EndCondition;
pub use error::{ConfigError, ScoringError, StateError, StoreError};
pub use history::ScoringSession;
pub use model::{
    format_overs, BattingStat, BowlingStat, ExtraPolicy, Extras, InningsData, InningsNumber, Match,
    MatchConfig, MatchStatus, Role, BALLS_PER_OVER, MAX_OVERS, MAX_RUNS_PER_BALL, MAX_WICKETS,
};
pub use resolver::resolve_ball;
pub use store::{from_json, to_json, JsonFileStore, MatchStore, MemoryStore, DEFAULT_STORE_KEY};
pub use summary::{match_result, run_rate, scoreboard, timeline, Margin, MatchResult, Scoreboard};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_innings_session() {
        let mut session = ScoringSession::in_memory();
        session
            .start_match(MatchConfig {
                total_overs: 1,
                team_one_name: "Lions".into(),
                team_two_name: "Tigers".into(),
                team_one_players: vec!["A".into(), "B".into()],
                team_two_players: vec!["X".into(), "Y".into()],
                ..MatchConfig::default()
            })
            .unwrap();

        session.assign_player(Role::Striker, "A").unwrap();
        session.assign_player(Role::NonStriker, "B").unwrap();
        session.assign_player(Role::Bowler, "X").unwrap();
        for runs in [4, 1, 0, 6, 2, 1] {
            session.record_ball(&BallRequest::ordinary(runs)).unwrap();
        }
        assert_eq!(session.end_condition(), Some(EndCondition::OversExhausted));
        session.end_innings().unwrap();

        session.assign_player(Role::Striker, "X").unwrap();
        session.assign_player(Role::NonStriker, "Y").unwrap();
        session.assign_player(Role::Bowler, "B").unwrap();
        session.record_ball(&BallRequest::ordinary(6)).unwrap();
        session.record_ball(&BallRequest::ordinary(6)).unwrap();
        assert_eq!(session.end_condition(), None);
        session.record_ball(&BallRequest::ordinary(4)).unwrap();
        assert_eq!(session.end_condition(), Some(EndCondition::TargetReached));
        session.end_innings().unwrap();

        let m = session.current().unwrap();
        assert_eq!(m.innings_one.total_runs, 14);
        assert_eq!(
            match_result(m),
            Some(MatchResult::Won { team: "Tigers".into(), margin: Margin::Wickets(1) })
        );
    }
}
