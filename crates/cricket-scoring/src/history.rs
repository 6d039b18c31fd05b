//! Scoring session with snapshot undo/redo
//!
//! Every accepted mutation pushes a detached copy of the previous match onto
//! the undo stack and clears the redo stack. Rejected requests leave the
//! match and both stacks untouched. The current match is saved to the store
//! after every accepted change.

use std::collections::VecDeque;

use crate::ball::BallRequest;
use crate::controller::EndCondition;
use crate::error::ScoringError;
use crate::model::{Match, MatchConfig, Role};
use crate::store::{MatchStore, MemoryStore};

/// The single owned match plus its undo/redo history
#[derive(Debug)]
pub struct ScoringSession<S: MatchStore = MemoryStore> {
    current: Option<Match>,
    past: Vec<Match>,
    future: VecDeque<Match>,
    store: S,
}

impl ScoringSession<MemoryStore> {
    /// A session with nothing saved
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new())
    }
}

impl Default for ScoringSession<MemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: MatchStore> ScoringSession<S> {
    /// Resume whatever match the store holds. Unreadable data means no match.
    pub fn open(store: S) -> Self {
        let current = match store.load() {
            Ok(found) => found,
            Err(e) => {
                log::warn!("discarding unreadable saved match: {}", e);
                None
            }
        };
        if let Some(m) = &current {
            log::info!(
                "resumed match {} vs {}",
                m.config.team_one_name,
                m.config.team_two_name
            );
        }
        Self { current, past: Vec::new(), future: VecDeque::new(), store }
    }

    pub fn current(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Config of the loaded match, for reusing overs and rules in a new one
    pub fn last_config(&self) -> Option<MatchConfig> {
        self.current.as_ref().map(|m| m.config.clone())
    }

    /// Replace any existing match and its history with a fresh one
    pub fn start_match(&mut self, config: MatchConfig) -> Result<(), ScoringError> {
        let started = Match::start(config)?;
        self.current = Some(started);
        self.past.clear();
        self.future.clear();
        self.persist();
        Ok(())
    }

    pub fn record_ball(&mut self, request: &BallRequest) -> Result<(), ScoringError> {
        self.apply(|m| m.record_ball(request))
    }

    pub fn assign_player(&mut self, role: Role, name: &str) -> Result<(), ScoringError> {
        self.apply(|m| m.assign_player(role, name))
    }

    pub fn end_innings(&mut self) -> Result<(), ScoringError> {
        self.apply(Match::end_innings)
    }

    /// Step back one mutation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        if let Some(undone) = self.current.replace(previous) {
            self.future.push_front(undone);
        }
        log::debug!("undo ({} left)", self.past.len());
        self.persist();
        true
    }

    /// Reapply the last undone mutation. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        if let Some(redone) = self.current.replace(next) {
            self.past.push(redone);
        }
        log::debug!("redo ({} left)", self.future.len());
        self.persist();
        true
    }

    pub fn eligible_batters(&self) -> Vec<String> {
        self.current.as_ref().map(Match::eligible_batters).unwrap_or_default()
    }

    pub fn eligible_bowlers(&self) -> Vec<String> {
        self.current.as_ref().map(Match::eligible_bowlers).unwrap_or_default()
    }

    pub fn end_condition(&self) -> Option<EndCondition> {
        self.current.as_ref().and_then(Match::end_condition)
    }

    /// Run `op` on a copy; commit the copy only if it succeeds and changed something
    fn apply<F>(&mut self, op: F) -> Result<(), ScoringError>
    where
        F: FnOnce(&mut Match) -> Result<(), ScoringError>,
    {
        let Some(current) = self.current.as_ref() else {
            log::warn!("request ignored: no match in progress");
            return Err(ScoringError::NoMatch);
        };

        let mut next = current.clone();
        if let Err(e) = op(&mut next) {
            log::debug!("request rejected: {}", e);
            return Err(e);
        }
        if next == *current {
            return Ok(());
        }

        if let Some(previous) = self.current.replace(next) {
            self.past.push(previous);
        }
        self.future.clear();
        self.persist();
        Ok(())
    }

    fn persist(&mut self) {
        if let Some(m) = &self.current {
            if let Err(e) = self.store.save(m) {
                log::warn!("failed to save match: {}", e);
            }
        }
    }
}
