//! Game controller.
//!
//! Connects player intents (choose, go back, new game, save, load, delete)
//! to the story backend and the [`ScenePlayer`]. Backend failures never
//! escape: each becomes a player-facing message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tendertale_core::backend::SceneBackend;
use tendertale_core::error::BackendError;
use tendertale_core::presentation::{
    AudioControls, DEFAULT_MESSAGE_DURATION, MessageDisplay, Severity,
};
use tendertale_core::save::SaveState;
use tendertale_core::scene::Scene;
use tracing::{error, info, instrument, warn};

use crate::application::engine::{AUTOPLAY_BLOCKED_MESSAGE, PlaybackReport, ScenePlayer};

/// Scene a new game starts at unless configured otherwise.
pub const DEFAULT_START_SCENE: &str = "scene_1";

/// Drives a [`ScenePlayer`] on behalf of one player.
pub struct GameController {
    backend: Arc<dyn SceneBackend>,
    player: ScenePlayer,
    messages: Arc<dyn MessageDisplay>,
    audio: Arc<dyn AudioControls>,
    user_id: String,
    start_scene: String,
    current: Mutex<Option<Scene>>,
}

impl GameController {
    /// Creates a controller for `user_id` starting at [`DEFAULT_START_SCENE`].
    pub fn new(
        backend: Arc<dyn SceneBackend>,
        player: ScenePlayer,
        messages: Arc<dyn MessageDisplay>,
        audio: Arc<dyn AudioControls>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            player,
            messages,
            audio,
            user_id: user_id.into(),
            start_scene: DEFAULT_START_SCENE.to_owned(),
            current: Mutex::new(None),
        }
    }

    /// Overrides the scene new games start at.
    #[must_use]
    pub fn with_start_scene(mut self, scene_id: impl Into<String>) -> Self {
        self.start_scene = scene_id.into();
        self
    }

    /// The scene player driven by this controller.
    #[must_use]
    pub fn player(&self) -> &ScenePlayer {
        &self.player
    }

    /// The scene most recently handed to the player.
    #[must_use]
    pub fn current_scene(&self) -> Option<Scene> {
        self.lock_current().clone()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Scene>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_scene_id(&self) -> Option<String> {
        self.lock_current().as_ref().map(|scene| scene.id.clone())
    }

    fn notify(&self, text: &str, severity: Severity) {
        self.messages
            .display(text, severity, DEFAULT_MESSAGE_DURATION);
    }

    fn report_failure(&self, action: &str, err: &BackendError) {
        error!(error = %err, action, "backend request failed");
        self.notify(&format!("Failed to {action}: {err}"), Severity::Error);
    }

    async fn play(&self, scene: Scene, push_to_history: bool) -> PlaybackReport {
        *self.lock_current() = Some(scene.clone());
        self.player.play_scene(Some(scene), push_to_history).await
    }

    async fn play_start_scene(&self, action: &str) -> Option<PlaybackReport> {
        match self.backend.fetch_scene(&self.start_scene).await {
            Ok(scene) => Some(self.play(scene, true).await),
            Err(err) => {
                self.report_failure(action, &err);
                None
            }
        }
    }

    /// Fetches and plays the start scene.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn start_game(&self) -> Option<PlaybackReport> {
        info!(start_scene = %self.start_scene, "starting game");
        self.play_start_scene("load the opening scene").await
    }

    /// Takes the choice at `choice_index` of the current scene. The backend
    /// resolves the next scene and records progress.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn choose(&self, choice_index: usize) -> Option<PlaybackReport> {
        let Some(scene_id) = self.current_scene_id() else {
            warn!("choice made without a current scene");
            self.notify("There is no current scene to choose from.", Severity::Error);
            return None;
        };
        match self
            .backend
            .send_choice(&self.user_id, &scene_id, choice_index)
            .await
        {
            Ok(next) => {
                info!(from = %scene_id, to = %next.id, "choice taken");
                Some(self.play(next, true).await)
            }
            Err(err) => {
                self.report_failure("process the choice", &err);
                None
            }
        }
    }

    /// Returns to the previous scene in the history. The history is only
    /// popped once the previous scene was fetched.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn go_back(&self) -> Option<PlaybackReport> {
        let Some(previous) = self.player.history().previous().map(str::to_owned) else {
            self.notify(
                "This is the first scene. There is nowhere to go back to.",
                Severity::Warning,
            );
            return None;
        };
        match self.backend.fetch_scene(&previous).await {
            Ok(scene) => {
                self.player.with_history(|history| {
                    history.go_back();
                });
                Some(self.play(scene, false).await)
            }
            Err(err) => {
                self.report_failure("load the previous scene", &err);
                None
            }
        }
    }

    /// Forgets the history and plays the start scene.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn new_game(&self) -> Option<PlaybackReport> {
        self.player.with_history(|history| history.clear());
        let scene = match self.backend.fetch_scene(&self.start_scene).await {
            Ok(scene) => scene,
            Err(err) => {
                self.report_failure("start a new game", &err);
                return None;
            }
        };
        self.notify("New game started!", Severity::Success);
        Some(self.play(scene, true).await)
    }

    /// Saves the current scene and history. Returns whether the backend
    /// accepted the save.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn save_game(&self) -> bool {
        let Some(scene_id) = self.current_scene_id() else {
            self.notify(
                "Cannot save: there is no current scene.",
                Severity::Warning,
            );
            return false;
        };
        let state = SaveState::new(scene_id, self.player.history().entries().to_vec());
        match self.backend.save_game(&self.user_id, &state).await {
            Ok(message) => {
                info!(scene_id = %state.current_scene_id, "game saved");
                self.notify(&message, Severity::Success);
                true
            }
            Err(err) => {
                self.report_failure("save the game", &err);
                false
            }
        }
    }

    /// Restores the saved history and plays the saved scene without pushing
    /// it again.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load_game(&self) -> Option<PlaybackReport> {
        let state = match self.backend.load_game(&self.user_id).await {
            Ok(state) => state,
            Err(BackendError::NotFound(_)) => {
                self.notify("No saved game found.", Severity::Warning);
                return None;
            }
            Err(err) => {
                self.report_failure("load the game", &err);
                return None;
            }
        };
        if state.current_scene_id.is_empty() {
            warn!("save state without a current scene");
            self.notify("The saved game is invalid.", Severity::Error);
            return None;
        }

        let scene = match self.backend.fetch_scene(&state.current_scene_id).await {
            Ok(scene) => scene,
            Err(err) => {
                self.report_failure("load the saved scene", &err);
                return None;
            }
        };
        let mut entries = state.scene_history;
        if entries.is_empty() {
            entries.push(state.current_scene_id);
        }
        self.player.with_history(|history| history.replace(entries));
        self.notify("Game loaded!", Severity::Success);
        Some(self.play(scene, false).await)
    }

    /// Deletes the save and restarts from the start scene.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn delete_game(&self) -> Option<PlaybackReport> {
        match self.backend.delete_game(&self.user_id).await {
            Ok(message) => self.notify(&message, Severity::Success),
            Err(BackendError::NotFound(_)) => {
                self.notify("There is no saved game to delete.", Severity::Warning);
                return None;
            }
            Err(err) => {
                self.report_failure("delete the save", &err);
                return None;
            }
        }
        self.player.with_history(|history| history.clear());
        self.play_start_scene("restart after deleting the save")
            .await
    }

    /// Plays or pauses background music. Returns whether music now plays.
    pub fn toggle_music(&self) -> bool {
        match self.audio.toggle() {
            Ok(playing) => playing,
            Err(err) => {
                warn!(error = %err, "background music did not start");
                self.notify(AUTOPLAY_BLOCKED_MESSAGE, Severity::Warning);
                false
            }
        }
    }

    /// Flips the mute flag. Returns whether audio is now muted.
    pub fn toggle_mute(&self) -> bool {
        self.audio.mute()
    }
}
