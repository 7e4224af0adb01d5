//! Player save state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player's persisted progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    /// The scene the player will resume at.
    pub current_scene_id: String,
    /// Visited scene ids, oldest first.
    #[serde(default)]
    pub scene_history: Vec<String>,
    /// When the save was written, stamped by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveState {
    /// Creates an unstamped save state.
    #[must_use]
    pub fn new(current_scene_id: impl Into<String>, scene_history: Vec<String>) -> Self {
        Self {
            current_scene_id: current_scene_id.into(),
            scene_history,
            saved_at: None,
        }
    }
}
