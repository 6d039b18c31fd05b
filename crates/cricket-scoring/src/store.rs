//! Match persistence
//!
//! The session loads once at start and saves after every accepted change.
//! Storage failures stay here: the session logs them and carries on.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::model::Match;

/// Name the scorer persists its match under
pub const DEFAULT_STORE_KEY: &str = "sandhu_cricket_match";

/// Where a match lives between sessions
pub trait MatchStore {
    /// `Ok(None)` when nothing has been saved
    fn load(&self) -> Result<Option<Match>, StoreError>;

    fn save(&mut self, state: &Match) -> Result<(), StoreError>;
}

pub fn to_json(state: &Match) -> Result<String, StoreError> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a saved match, refusing one that breaks the model invariants
pub fn from_json(json: &str) -> Result<Match, StoreError> {
    let state: Match = serde_json::from_str(json)?;
    state.validate()?;
    Ok(state)
}

/// Keeps the serialized match in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with previously persisted JSON (e.g. read from browser storage)
    pub fn with_json(json: impl Into<String>) -> Self {
        Self { json: Some(json.into()) }
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl MatchStore for MemoryStore {
    fn load(&self) -> Result<Option<Match>, StoreError> {
        self.json.as_deref().map(from_json).transpose()
    }

    fn save(&mut self, state: &Match) -> Result<(), StoreError> {
        self.json = Some(to_json(state)?);
        Ok(())
    }
}

/// One JSON file per match
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/sandhu_cricket_match.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", DEFAULT_STORE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for JsonFileStore {
    fn load(&self) -> Result<Option<Match>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        from_json(&json).map(Some)
    }

    fn save(&mut self, state: &Match) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;

        // Write beside the target, then rename over it
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        log::debug!("saved {} bytes to {:?}", json.len(), self.path);
        Ok(())
    }
}
