//! Mock `SceneBackend` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tendertale_core::backend::SceneBackend;
use tendertale_core::error::BackendError;
use tendertale_core::save::SaveState;
use tendertale_core::scene::Scene;

/// A backend serving scenes from memory with per-user save slots. Records
/// every fetch and choice so tests can assert on traffic.
#[derive(Debug, Default)]
pub struct InMemorySceneBackend {
    scenes: HashMap<String, Scene>,
    saves: Mutex<HashMap<String, SaveState>>,
    fetched: Mutex<Vec<String>>,
    choices: Mutex<Vec<(String, String, usize)>>,
}

impl InMemorySceneBackend {
    /// Creates a backend serving `scenes`, keyed by scene id.
    #[must_use]
    pub fn new(scenes: impl IntoIterator<Item = Scene>) -> Self {
        Self {
            scenes: scenes.into_iter().map(|s| (s.id.clone(), s)).collect(),
            ..Self::default()
        }
    }

    /// Pre-populates the save slot for `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_save(self, user_id: &str, state: SaveState) -> Self {
        self.saves.lock().unwrap().insert(user_id.to_owned(), state);
        self
    }

    /// Returns the ids of all fetched scenes, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Returns every `(user_id, scene_id, choice_index)` sent.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn choices(&self) -> Vec<(String, String, usize)> {
        self.choices.lock().unwrap().clone()
    }

    /// Returns the save slot for `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_of(&self, user_id: &str) -> Option<SaveState> {
        self.saves.lock().unwrap().get(user_id).cloned()
    }

    fn scene(&self, scene_id: &str) -> Result<Scene, BackendError> {
        self.scenes
            .get(scene_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("scene '{scene_id}'")))
    }
}

#[async_trait]
impl SceneBackend for InMemorySceneBackend {
    async fn fetch_scene(&self, scene_id: &str) -> Result<Scene, BackendError> {
        self.fetched.lock().unwrap().push(scene_id.to_owned());
        self.scene(scene_id)
    }

    async fn send_choice(
        &self,
        user_id: &str,
        scene_id: &str,
        choice_index: usize,
    ) -> Result<Scene, BackendError> {
        self.choices
            .lock()
            .unwrap()
            .push((user_id.to_owned(), scene_id.to_owned(), choice_index));
        let current = self.scene(scene_id)?;
        let choice = current
            .choices
            .get(choice_index)
            .ok_or_else(|| BackendError::Rejected {
                status: 400,
                message: "invalid choice index".to_owned(),
            })?;
        self.scene(&choice.next_scene)
    }

    async fn save_game(&self, user_id: &str, state: &SaveState) -> Result<String, BackendError> {
        self.saves
            .lock()
            .unwrap()
            .insert(user_id.to_owned(), state.clone());
        Ok("Game state saved successfully".to_owned())
    }

    async fn load_game(&self, user_id: &str) -> Result<SaveState, BackendError> {
        self.saves
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("save for '{user_id}'")))
    }

    async fn delete_game(&self, user_id: &str) -> Result<String, BackendError> {
        self.saves
            .lock()
            .unwrap()
            .remove(user_id)
            .map(|_| "Save state deleted successfully".to_owned())
            .ok_or_else(|| BackendError::NotFound(format!("save for '{user_id}'")))
    }
}

/// A backend that is never reachable. Useful for testing error paths.
#[derive(Debug)]
pub struct FailingSceneBackend;

fn unreachable_backend() -> BackendError {
    BackendError::Network("connection refused".into())
}

#[async_trait]
impl SceneBackend for FailingSceneBackend {
    async fn fetch_scene(&self, _scene_id: &str) -> Result<Scene, BackendError> {
        Err(unreachable_backend())
    }

    async fn send_choice(
        &self,
        _user_id: &str,
        _scene_id: &str,
        _choice_index: usize,
    ) -> Result<Scene, BackendError> {
        Err(unreachable_backend())
    }

    async fn save_game(&self, _user_id: &str, _state: &SaveState) -> Result<String, BackendError> {
        Err(unreachable_backend())
    }

    async fn load_game(&self, _user_id: &str) -> Result<SaveState, BackendError> {
        Err(unreachable_backend())
    }

    async fn delete_game(&self, _user_id: &str) -> Result<String, BackendError> {
        Err(unreachable_backend())
    }
}
