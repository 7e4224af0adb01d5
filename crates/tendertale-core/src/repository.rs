//! Storage ports used by the backend server.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::save::SaveState;
use crate::scene::Scene;

/// Read access to authored scenes.
#[async_trait]
pub trait SceneRepository: Send + Sync {
    /// Load a scene by id.
    async fn load_scene(&self, scene_id: &str) -> Result<Scene, StoreError>;
}

/// Per-user save slots.
#[async_trait]
pub trait SaveRepository: Send + Sync {
    /// Load the save for a user.
    async fn load(&self, user_id: &str) -> Result<SaveState, StoreError>;

    /// Create or overwrite the save for a user.
    async fn store(&self, user_id: &str, state: &SaveState) -> Result<(), StoreError>;

    /// Delete the save for a user. `StoreError::NotFound` when absent.
    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;
}
