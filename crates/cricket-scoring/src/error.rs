//! Error types for rejected requests and persistence failures

use thiserror::Error;

use crate::controller::EndCondition;
use crate::model::Role;

/// Why a match configuration cannot start a match
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("total overs must be between 1 and {max}, got {found}")]
    InvalidOvers { found: u32, max: u32 },

    #[error("roster for {team} is empty")]
    EmptyRoster { team: String },

    #[error("{name} appears more than once in the roster for {team}")]
    DuplicatePlayer { team: String, name: String },
}

/// A deserialized match that breaks the data model's invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("current innings is {current} but second innings data does not match")]
    InningsMismatch { current: u8 },

    #[error("innings {innings} has {wickets} wickets")]
    TooManyWickets { innings: u8, wickets: u32 },

    #[error("innings {innings} has {balls} legal balls, limit is {max}")]
    TooManyBalls { innings: u8, balls: u32, max: u32 },

    #[error("innings {innings} history does not account for {balls} legal balls")]
    HistoryMismatch { innings: u8, balls: u32 },

    #[error("invalid match configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Why a scoring request was refused.
///
/// A refused request never changes the match or the undo/redo stacks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("no match in progress")]
    NoMatch,

    #[error("match is already completed")]
    MatchCompleted,

    #[error("players not assigned: {missing:?}")]
    PlayersNotAssigned { missing: Vec<Role> },

    #[error("innings is over: {0}")]
    InningsOver(EndCondition),

    #[error("{name} is not in the roster of {team}")]
    UnknownPlayer { name: String, team: String },

    #[error("{name} cannot bat: already dismissed or at the other end")]
    PlayerUnavailable { name: String },

    #[error("{runs} runs off one ball exceeds the limit of {max}")]
    ImplausibleRuns { runs: u32, max: u32 },

    #[error("{name} bowled the previous over")]
    BowlerUnavailable { name: String },

    #[error("invalid match configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Persistence failures. Game logic never sees these; the session logs them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid saved match: {0}")]
    InvalidState(#[from] StateError),
}
