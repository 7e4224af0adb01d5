//! Backend port consumed by the game controller.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::save::SaveState;
use crate::scene::Scene;

/// Request/response access to the story backend.
#[async_trait]
pub trait SceneBackend: Send + Sync {
    /// Fetch a scene by id.
    async fn fetch_scene(&self, scene_id: &str) -> Result<Scene, BackendError>;

    /// Report a choice taken in `scene_id` and receive the next scene.
    async fn send_choice(
        &self,
        user_id: &str,
        scene_id: &str,
        choice_index: usize,
    ) -> Result<Scene, BackendError>;

    /// Persist progress. Returns the backend's confirmation message.
    async fn save_game(&self, user_id: &str, state: &SaveState) -> Result<String, BackendError>;

    /// Load saved progress. `BackendError::NotFound` when nothing is saved.
    async fn load_game(&self, user_id: &str) -> Result<SaveState, BackendError>;

    /// Delete saved progress. `BackendError::NotFound` when nothing is saved.
    async fn delete_game(&self, user_id: &str) -> Result<String, BackendError>;
}
