//! WASM bindings for the browser scoring screen
//!
//! The page owns browser storage: it passes the saved JSON in at start and
//! writes `saved_json()` back after every call that returns successfully.

#![cfg(feature = "wasm")]

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::summary::{match_result, scoreboard, timeline};
use crate::{
    BallKind, BallRequest, InningsNumber, MatchConfig, MemoryStore, Role, ScoringSession, WhoOut,
};

fn parse_kind(kind: &str) -> Result<BallKind, JsError> {
    match kind {
        "legal" | "ordinary" => Ok(BallKind::Ordinary),
        "wide" => Ok(BallKind::Wide),
        "no-ball" => Ok(BallKind::NoBall),
        "wicket" => Ok(BallKind::Wicket),
        _ => Err(JsError::new(&format!("Unknown ball kind: {}", kind))),
    }
}

fn parse_who_out(who_out: &str) -> Result<WhoOut, JsError> {
    match who_out {
        "" | "striker" => Ok(WhoOut::Striker),
        "non-striker" => Ok(WhoOut::NonStriker),
        _ => Err(JsError::new(&format!("Unknown batter end: {}", who_out))),
    }
}

fn parse_role(role: &str) -> Result<Role, JsError> {
    match role {
        "striker" => Ok(Role::Striker),
        "non-striker" => Ok(Role::NonStriker),
        "bowler" => Ok(Role::Bowler),
        _ => Err(JsError::new(&format!("Unknown role: {}", role))),
    }
}

fn parse_innings(innings: u8) -> Result<InningsNumber, JsError> {
    InningsNumber::try_from(innings).map_err(|e| JsError::new(&e))
}

fn to_array(names: Vec<String>) -> Array {
    names.into_iter().map(JsValue::from).collect()
}

/// A scoring session held by the page
#[wasm_bindgen]
pub struct WasmScorer {
    session: ScoringSession<MemoryStore>,
}

#[wasm_bindgen]
impl WasmScorer {
    /// Resume from previously saved JSON, or start empty
    #[wasm_bindgen(constructor)]
    pub fn new(saved_json: Option<String>) -> WasmScorer {
        let store = match saved_json {
            Some(json) => MemoryStore::with_json(json),
            None => MemoryStore::new(),
        };
        WasmScorer { session: ScoringSession::open(store) }
    }

    /// Start a new match from a JSON `MatchConfig`
    #[wasm_bindgen(js_name = startMatch)]
    pub fn start_match(&mut self, config_json: &str) -> Result<(), JsError> {
        let config: MatchConfig = serde_json::from_str(config_json)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        self.session.start_match(config).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = recordBall)]
    pub fn record_ball(
        &mut self,
        kind: &str,
        runs_off_bat: u32,
        is_wicket: bool,
        who_out: &str,
    ) -> Result<(), JsError> {
        let request = BallRequest {
            kind: parse_kind(kind)?,
            runs_off_bat,
            is_wicket,
            who_out: parse_who_out(who_out)?,
        };
        self.session.record_ball(&request).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = assignPlayer)]
    pub fn assign_player(&mut self, role: &str, name: &str) -> Result<(), JsError> {
        let role = parse_role(role)?;
        self.session.assign_player(role, name).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = endInnings)]
    pub fn end_innings(&mut self) -> Result<(), JsError> {
        self.session.end_innings().map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Current match as a JS object, or null
    pub fn state(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.session.current())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// JSON to write to browser storage
    #[wasm_bindgen(js_name = savedJson)]
    pub fn saved_json(&self) -> Option<String> {
        self.session.store().json().map(str::to_string)
    }

    /// Config of the current match, for "load previous settings"
    #[wasm_bindgen(js_name = lastConfig)]
    pub fn last_config(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.session.last_config())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = eligibleBatters)]
    pub fn eligible_batters(&self) -> Array {
        to_array(self.session.eligible_batters())
    }

    #[wasm_bindgen(js_name = eligibleBowlers)]
    pub fn eligible_bowlers(&self) -> Array {
        to_array(self.session.eligible_bowlers())
    }

    /// `"target-reached"`, `"all-out"`, `"overs-exhausted"`, or undefined
    #[wasm_bindgen(js_name = endCondition)]
    pub fn end_condition(&self) -> Option<String> {
        self.session.end_condition().map(|c| c.as_str().to_string())
    }

    pub fn scoreboard(&self, innings: u8) -> Result<JsValue, JsError> {
        let number = parse_innings(innings)?;
        let board = self.session.current().and_then(|m| scoreboard(m, number));
        serde_wasm_bindgen::to_value(&board)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Display tokens grouped by over, e.g. `[["1","WD","4",...],["W"]]`
    pub fn timeline(&self, innings: u8) -> Result<JsValue, JsError> {
        let number = parse_innings(innings)?;
        let overs: Vec<Vec<String>> = self
            .session
            .current()
            .and_then(|m| m.innings(number))
            .map(|i| {
                timeline(i)
                    .iter()
                    .map(|over| over.iter().map(ToString::to_string).collect())
                    .collect()
            })
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(&overs)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Result once completed, otherwise null
    pub fn result(&self) -> Result<JsValue, JsError> {
        let result = self.session.current().and_then(match_result);
        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }
}

/// Default setup: 5 overs, wides and no-balls re-bowled with a run
#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> Result<String, JsError> {
    serde_json::to_string(&MatchConfig::default())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
