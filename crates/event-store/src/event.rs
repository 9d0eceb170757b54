//! Score event types
//!
//! Wire keys are PascalCase (`Minute`, `Player`, `Club`, `Score`) to stay
//! compatible with the existing broker clients.

use serde::{Deserialize, Serialize};

/// A single goal in a running match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreEvent {
    /// Match minute the goal fell in
    pub minute: u32,
    /// Goal scorer
    pub player: String,
    /// Scorer's club
    pub club: String,
    /// Running score after the goal, e.g. "1-2" (free-form, not parsed)
    pub score: String,
}

impl ScoreEvent {
    /// Check that every field is present and non-empty.
    ///
    /// An event failing this check must never reach the dispatcher.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.player.trim().is_empty() {
            return Err(ValidationError::EmptyField("Player"));
        }
        if self.club.trim().is_empty() {
            return Err(ValidationError::EmptyField("Club"));
        }
        if self.score.trim().is_empty() {
            return Err(ValidationError::EmptyField("Score"));
        }
        Ok(())
    }
}

/// A score event persisted at a broker, tagged with the sequence number
/// its local store assigned at insertion. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredEvent {
    /// Insertion sequence, unique per store
    pub seq: u64,
    #[serde(flatten)]
    pub event: ScoreEvent,
}

/// A malformed or incomplete score event
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing or empty field: {0}")]
    EmptyField(&'static str),
}
