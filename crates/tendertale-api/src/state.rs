//! Shared application state.

use std::sync::Arc;

use tendertale_core::clock::Clock;
use tendertale_core::repository::{SaveRepository, SceneRepository};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authored scenes.
    pub scenes: Arc<dyn SceneRepository>,
    /// Per-user save slots.
    pub saves: Arc<dyn SaveRepository>,
    /// Stamps save states.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        scenes: Arc<dyn SceneRepository>,
        saves: Arc<dyn SaveRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scenes,
            saves,
            clock,
        }
    }
}
