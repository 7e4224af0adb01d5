//! In-memory `SceneRepository` and `SaveRepository`
//! implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tendertale_core::error::StoreError;
use tendertale_core::repository::{SaveRepository, SceneRepository};
use tendertale_core::save::SaveState;
use tendertale_core::scene::Scene;

/// A scene repository serving a fixed set of scenes.
#[derive(Debug, Default)]
pub struct InMemorySceneRepository {
    scenes: HashMap<String, Scene>,
}

impl InMemorySceneRepository {
    /// Creates a repository serving `scenes`, keyed by scene id.
    #[must_use]
    pub fn new(scenes: impl IntoIterator<Item = Scene>) -> Self {
        Self {
            scenes: scenes.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

#[async_trait]
impl SceneRepository for InMemorySceneRepository {
    async fn load_scene(&self, scene_id: &str) -> Result<Scene, StoreError> {
        self.scenes
            .get(scene_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("scene '{scene_id}'")))
    }
}

/// A save repository backed by a map.
#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    saves: Mutex<HashMap<String, SaveState>>,
}

impl InMemorySaveRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored save for `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, user_id: &str) -> Option<SaveState> {
        self.saves.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl SaveRepository for InMemorySaveRepository {
    async fn load(&self, user_id: &str) -> Result<SaveState, StoreError> {
        self.get(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("no save state found for user {user_id}")))
    }

    async fn store(&self, user_id: &str, state: &SaveState) -> Result<(), StoreError> {
        self.saves
            .lock()
            .unwrap()
            .insert(user_id.to_owned(), state.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.saves
            .lock()
            .unwrap()
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("no save state found for user {user_id}")))
    }
}

/// A save repository whose storage always fails. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingSaveRepository;

#[async_trait]
impl SaveRepository for FailingSaveRepository {
    async fn load(&self, _user_id: &str) -> Result<SaveState, StoreError> {
        Err(StoreError::Io("disk unavailable".into()))
    }

    async fn store(&self, _user_id: &str, _state: &SaveState) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".into()))
    }

    async fn delete(&self, _user_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".into()))
    }
}
