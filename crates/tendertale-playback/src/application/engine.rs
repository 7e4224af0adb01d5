//! Scene playback engine.
//!
//! [`ScenePlayer::play_scene`] is the sole entry point. One call plays one
//! scene from fade-out to choices:
//!
//! `FadingOut → Building → CharactersEntering → FadingIn → (PlayingLine |
//! PlayingCommand)* → ShowingChoices → Idle`
//!
//! Each call owns a fresh [`ClickGate`] and overlay listener. Starting a new
//! playback supersedes the running one: its gate is discarded at entry and
//! its listener is detached while the new stage is built. A superseded
//! playback notices at its next suspension point and returns without
//! touching the display again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tendertale_core::clock::Delay;
use tendertale_core::presentation::{
    AudioControls, DEFAULT_MESSAGE_DURATION, MessageDisplay, Severity,
};
use tendertale_core::scene::{Character, DialogueEntry, Scene};
use tendertale_core::surface::{OPACITY, OverlayHandler, RenderSurface, TransitionTarget};
use tracing::{Span, debug, field, info, instrument, warn};
use uuid::Uuid;

use crate::config::PlaybackConfig;
use crate::domain::cast::Cast;
use crate::domain::commands::{CommandOutcome, CommandProcessor};
use crate::domain::gate::{Advance, ClickGate};
use crate::domain::history::SceneHistory;
use crate::domain::overlay::OverlayListener;
use crate::domain::transition::{TransitionOrchestrator, TransitionOutcome};
use crate::domain::typing::{LineTyped, SpeakerPalette, TypingAnimator};

/// Message shown when the host refuses to start background music.
pub const AUTOPLAY_BLOCKED_MESSAGE: &str = "Music autoplay was blocked. Click again to play.";

/// Stages of one playback, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Waiting for the old stage to fade out.
    FadingOut,
    /// Tearing down the old stage and building the new one.
    Building,
    /// Placing the opening characters.
    CharactersEntering,
    /// Waiting for the new stage to fade in.
    FadingIn,
    /// Typing a line of dialogue or waiting for the click after it.
    PlayingLine,
    /// Applying a stage command.
    PlayingCommand,
    /// Presenting the scene's choices.
    ShowingChoices,
    /// Playback finished.
    Idle,
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The scene played through to its choices.
    Completed,
    /// There was no scene to play; the display was not touched.
    Aborted,
    /// A newer playback took over before this one finished.
    Superseded,
}

/// Summary of one `play_scene` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Identifier of this playback, also recorded on its tracing span.
    pub playback_id: Uuid,
    /// Id of the played scene; `None` when aborted.
    pub scene_id: Option<String>,
    /// How playback ended.
    pub outcome: PlaybackOutcome,
    /// States entered, in order. Consecutive repeats are collapsed.
    pub states: Vec<PlaybackState>,
    /// Text lines put on screen.
    pub lines_typed: usize,
    /// Text lines whose animation was skipped by a click.
    pub lines_skipped: usize,
    /// Click-gate waits entered.
    pub advance_waits: usize,
    /// Stage commands that changed the stage.
    pub commands_applied: usize,
    /// Stage commands skipped as not applicable.
    pub commands_skipped: usize,
    /// Choices presented at the end.
    pub choices_shown: usize,
}

impl PlaybackReport {
    fn new(playback_id: Uuid, scene_id: Option<String>) -> Self {
        Self {
            playback_id,
            scene_id,
            outcome: PlaybackOutcome::Completed,
            states: Vec::new(),
            lines_typed: 0,
            lines_skipped: 0,
            advance_waits: 0,
            commands_applied: 0,
            commands_skipped: 0,
            choices_shown: 0,
        }
    }

    fn enter(&mut self, state: PlaybackState) {
        if self.states.last() != Some(&state) {
            debug!(?state, "playback state");
            self.states.push(state);
        }
    }

    fn finish(mut self, outcome: PlaybackOutcome) -> Self {
        self.outcome = outcome;
        if outcome == PlaybackOutcome::Superseded {
            info!("playback superseded");
        }
        self
    }

    /// The last state entered.
    #[must_use]
    pub fn final_state(&self) -> Option<PlaybackState> {
        self.states.last().copied()
    }
}

/// The playback currently owning the stage.
#[derive(Debug)]
struct ActivePlayback {
    playback_id: Uuid,
    gate: Arc<ClickGate>,
    listener: Option<OverlayListener>,
}

/// Plays scenes on a render surface.
pub struct ScenePlayer {
    surface: Arc<dyn RenderSurface>,
    delay: Arc<dyn Delay>,
    audio: Arc<dyn AudioControls>,
    messages: Arc<dyn MessageDisplay>,
    config: PlaybackConfig,
    palette: SpeakerPalette,
    transitions: TransitionOrchestrator,
    history: Mutex<SceneHistory>,
    active: Mutex<Option<ActivePlayback>>,
}

impl ScenePlayer {
    /// Creates a player with an empty scene history.
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        delay: Arc<dyn Delay>,
        audio: Arc<dyn AudioControls>,
        messages: Arc<dyn MessageDisplay>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            surface,
            delay,
            audio,
            messages,
            palette: SpeakerPalette::from_config(&config),
            transitions: TransitionOrchestrator::new(config.transition_timeout()),
            config,
            history: Mutex::new(SceneHistory::new()),
            active: Mutex::new(None),
        }
    }

    /// Snapshot of the scene history.
    #[must_use]
    pub fn history(&self) -> SceneHistory {
        self.lock_history().clone()
    }

    /// Runs `f` with exclusive access to the scene history.
    pub fn with_history<R>(&self, f: impl FnOnce(&mut SceneHistory) -> R) -> R {
        f(&mut self.lock_history())
    }

    fn lock_history(&self) -> MutexGuard<'_, SceneHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActivePlayback>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plays `scene`, pushing its id onto the history when `push_to_history`
    /// is set. An absent scene is logged and leaves the display untouched.
    #[instrument(
        skip(self, scene),
        fields(
            scene_id = scene.as_ref().map_or("<none>", |s| s.id.as_str()),
            playback_id = field::Empty,
        )
    )]
    pub async fn play_scene(&self, scene: Option<Scene>, push_to_history: bool) -> PlaybackReport {
        let playback_id = Uuid::new_v4();
        Span::current().record("playback_id", field::display(playback_id));

        let Some(scene) = scene else {
            warn!("no scene to play, leaving the stage as it is");
            return PlaybackReport::new(playback_id, None).finish(PlaybackOutcome::Aborted);
        };
        info!(
            entries = scene.dialogue.len(),
            choices = scene.choices.len(),
            "playing scene"
        );

        let gate = Arc::new(ClickGate::new());
        let previous = self.lock_active().replace(ActivePlayback {
            playback_id,
            gate: Arc::clone(&gate),
            listener: None,
        });
        if let Some(previous) = &previous {
            debug!(superseded = %previous.playback_id, "superseding running playback");
            previous.gate.supersede();
        }

        let mut report = PlaybackReport::new(playback_id, Some(scene.id.clone()));

        report.enter(PlaybackState::FadingOut);
        self.fade_stage(|surface| surface.fade_out()).await;
        if gate.is_superseded() {
            return report.finish(PlaybackOutcome::Superseded);
        }

        report.enter(PlaybackState::Building);
        drop(previous);
        self.build_stage(&scene, push_to_history);
        self.attach_listener(playback_id, &gate);

        report.enter(PlaybackState::CharactersEntering);
        let Some(mut cast) = self.stage_characters(&scene.characters, &gate).await else {
            return report.finish(PlaybackOutcome::Superseded);
        };

        report.enter(PlaybackState::FadingIn);
        self.fade_stage(|surface| surface.fade_in()).await;
        if gate.is_superseded() {
            return report.finish(PlaybackOutcome::Superseded);
        }

        let animator = TypingAnimator::new(
            self.surface.as_ref(),
            self.delay.as_ref(),
            &gate,
            self.config.typing_speed(),
        );
        let processor =
            CommandProcessor::new(self.surface.as_ref(), self.delay.as_ref(), &self.config);

        for entry in &scene.dialogue {
            match entry {
                DialogueEntry::Command(command) => {
                    report.enter(PlaybackState::PlayingCommand);
                    match processor.apply(command, &mut cast).await {
                        CommandOutcome::Applied => report.commands_applied += 1,
                        CommandOutcome::Skipped => report.commands_skipped += 1,
                    }
                    if gate.is_superseded() {
                        return report.finish(PlaybackOutcome::Superseded);
                    }
                }
                DialogueEntry::Line(line) => {
                    report.enter(PlaybackState::PlayingLine);
                    let label = line.speaker.as_deref().map(|name| self.palette.label(name));
                    match animator.type_line(label.as_ref(), &line.text).await {
                        LineTyped::Superseded => {
                            return report.finish(PlaybackOutcome::Superseded);
                        }
                        LineTyped::Skipped => report.lines_skipped += 1,
                        LineTyped::Completed => {}
                    }
                    report.lines_typed += 1;
                    report.advance_waits += 1;
                    if gate.wait_for_advance().await == Advance::Abandoned {
                        return report.finish(PlaybackOutcome::Superseded);
                    }
                }
            }
        }

        report.enter(PlaybackState::ShowingChoices);
        if scene.choices.is_empty() {
            self.surface.hide_choices();
        } else {
            self.surface.show_choices(&scene.choices);
        }
        report.choices_shown = scene.choices.len();
        self.surface.set_overlay_visible(false);
        self.release_listener(playback_id);

        report.enter(PlaybackState::Idle);
        info!(
            lines = report.lines_typed,
            skipped = report.lines_skipped,
            commands = report.commands_applied,
            "scene finished"
        );
        report.finish(PlaybackOutcome::Completed)
    }

    async fn fade_stage(&self, trigger: impl FnOnce(&dyn RenderSurface)) -> TransitionOutcome {
        let wait = self
            .transitions
            .arm(self.surface.as_ref(), TransitionTarget::Stage, Some(OPACITY));
        trigger(self.surface.as_ref());
        wait.completed().await
    }

    fn build_stage(&self, scene: &Scene, push_to_history: bool) {
        self.surface.build_stage(&scene.id);
        let background = scene
            .background
            .as_deref()
            .map(|image| self.config.asset_path(image));
        self.surface.set_background(background.as_deref());

        let can_go_back = self.with_history(|history| {
            if push_to_history && history.push(&scene.id) {
                debug!(depth = history.len(), "scene pushed onto history");
            }
            history.can_go_back()
        });
        self.surface.set_previous_enabled(can_go_back);
    }

    fn attach_listener(&self, playback_id: Uuid, gate: &Arc<ClickGate>) {
        let handler: OverlayHandler = {
            let gate = Arc::clone(gate);
            let audio = Arc::clone(&self.audio);
            let messages = Arc::clone(&self.messages);
            Arc::new(move || {
                if let Err(error) = audio.resume_if_paused() {
                    warn!(%error, "background music did not start");
                    messages.display(
                        AUTOPLAY_BLOCKED_MESSAGE,
                        Severity::Warning,
                        DEFAULT_MESSAGE_DURATION,
                    );
                }
                gate.signal_advance();
            })
        };
        let listener = OverlayListener::attach(Arc::clone(&self.surface), handler);
        let mut active = self.lock_active();
        if let Some(active) = active.as_mut().filter(|a| a.playback_id == playback_id) {
            active.listener = Some(listener);
        }
    }

    fn release_listener(&self, playback_id: Uuid) {
        let listener = self
            .lock_active()
            .as_mut()
            .filter(|a| a.playback_id == playback_id)
            .and_then(|a| a.listener.take());
        drop(listener);
    }

    /// Places the opening characters hidden, waits for the entry delay and
    /// reveals them. Returns `None` when superseded during the wait.
    async fn stage_characters(&self, characters: &[Character], gate: &ClickGate) -> Option<Cast> {
        let mut cast = Cast::new();
        for character in characters {
            if cast.insert(character.clone()).is_some() {
                warn!(
                    character = %character.name,
                    "duplicate opening character, keeping the last one"
                );
                self.surface.remove_character(&character.name);
            }
            self.surface.place_character(
                &character.name,
                &self.config.asset_path(&character.sprite),
                &character.position,
                false,
            );
        }
        if cast.is_empty() {
            return Some(cast);
        }

        self.delay.sleep(self.config.character_entry_delay()).await;
        if gate.is_superseded() {
            return None;
        }
        for character in cast.iter() {
            self.surface.set_character_visible(&character.name, true);
        }
        Some(cast)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tendertale_core::scene::{Choice, Position, StageCommand};
    use tendertale_test_support::{
        InstantDelay, RecordingAudio, RecordingMessages, RecordingSurface, SurfaceCall,
        with_auto_clicks, with_clicks_when_blocked,
    };

    use super::*;

    struct Fixture {
        surface: Arc<RecordingSurface>,
        delay: Arc<InstantDelay>,
        audio: Arc<RecordingAudio>,
        messages: Arc<RecordingMessages>,
        player: ScenePlayer,
    }

    fn fixture_with(
        surface: RecordingSurface,
        audio: RecordingAudio,
        config: PlaybackConfig,
    ) -> Fixture {
        let surface = Arc::new(surface);
        let delay = Arc::new(InstantDelay::new());
        let audio = Arc::new(audio);
        let messages = Arc::new(RecordingMessages::new());
        let player = ScenePlayer::new(
            surface.clone(),
            delay.clone(),
            audio.clone(),
            messages.clone(),
            config,
        );
        Fixture {
            surface,
            delay,
            audio,
            messages,
            player,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(
            RecordingSurface::new(),
            RecordingAudio::new(),
            PlaybackConfig::default(),
        )
    }

    fn scene_with_line(id: &str, text: &str) -> Scene {
        let mut scene = Scene::new(id);
        scene.dialogue.push(DialogueEntry::line(Some("Алиса"), text));
        scene
    }

    fn command(command: StageCommand) -> DialogueEntry {
        DialogueEntry::Command(command)
    }

    #[tokio::test]
    async fn test_scene_with_one_line_and_one_choice_ends_showing_that_choice() {
        // Arrange
        let f = fixture();
        let mut scene = scene_with_line("s1", "Hello there.");
        scene.choices.push(Choice::new("Go", "s2"));

        // Act
        let report = with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        // Assert
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(
            report.states,
            vec![
                PlaybackState::FadingOut,
                PlaybackState::Building,
                PlaybackState::CharactersEntering,
                PlaybackState::FadingIn,
                PlaybackState::PlayingLine,
                PlaybackState::ShowingChoices,
                PlaybackState::Idle,
            ]
        );
        assert_eq!(report.choices_shown, 1);
        let state = f.surface.state();
        assert_eq!(state.choices, Some(vec!["Go".to_owned()]));
        assert_eq!(state.text, "Hello there.");
        assert!(!state.overlay_visible);
        assert_eq!(f.surface.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_every_text_line_waits_for_a_click_and_commands_do_not() {
        // Arrange
        let f = fixture();
        let mut scene = Scene::new("s1");
        scene.dialogue = vec![
            DialogueEntry::line(Some("Алиса"), "One."),
            command(StageCommand::AddCharacter {
                character: Character::new("Mai", "mai.png", Position::Right),
            }),
            DialogueEntry::line(None, "Two."),
            command(StageCommand::ChangeSprite {
                character: "Mai".to_owned(),
                sprite: "mai_happy.png".to_owned(),
            }),
            DialogueEntry::line(Some("Mai"), "Three."),
        ];

        // Act
        let (report, clicks) =
            with_clicks_when_blocked(&f.surface, f.player.play_scene(Some(scene.clone()), true))
                .await;

        // Assert
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(clicks, scene.text_line_count());
        assert_eq!(report.advance_waits, clicks);
        assert_eq!(report.lines_skipped, 0);
        assert_eq!(report.lines_typed, 3);
        assert_eq!(report.commands_applied, 2);
        assert_eq!(f.delay.count_of(Duration::from_millis(200)), 2);
        assert_eq!(f.surface.state().characters[0].sprite, "assets/mai_happy.png");
    }

    #[tokio::test]
    async fn test_malformed_commands_are_skipped_without_waiting_for_a_click() {
        // Arrange
        let f = fixture();
        let scene: Scene = serde_json::from_str(
            r#"{"id":"s1","dialogue":[
                {"command":"remove_character","character":"Mai"},
                {"speaker":"Алиса","text":"Only line."},
                {"command":"change_sprite","character":"Mai"}
            ]}"#,
        )
        .unwrap();

        // Act
        let (report, clicks) =
            with_clicks_when_blocked(&f.surface, f.player.play_scene(Some(scene), true)).await;

        // Assert
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(clicks, 1);
        assert_eq!(report.lines_typed, 1);
        assert_eq!(report.commands_skipped, 2);
        assert_eq!(f.delay.count_of(Duration::from_millis(200)), 0);
        assert_eq!(f.surface.state().text, "Only line.");
    }

    #[tokio::test]
    async fn test_absent_scene_aborts_without_touching_display() {
        let f = fixture();

        let report = f.player.play_scene(None, true).await;

        assert_eq!(report.outcome, PlaybackOutcome::Aborted);
        assert!(report.states.is_empty());
        assert!(f.surface.calls().is_empty());
        assert!(f.player.history().is_empty());
    }

    #[tokio::test]
    async fn test_playing_same_scene_twice_does_not_duplicate_history() {
        // Arrange
        let f = fixture();

        // Act
        with_auto_clicks(&f.surface, f.player.play_scene(Some(Scene::new("s1")), true)).await;
        with_auto_clicks(&f.surface, f.player.play_scene(Some(Scene::new("s1")), true)).await;

        // Assert
        assert_eq!(f.player.history().entries(), ["s1"]);
        assert!(!f.surface.state().previous_enabled);
    }

    #[tokio::test]
    async fn test_previous_is_enabled_once_history_has_two_scenes() {
        let f = fixture();

        with_auto_clicks(&f.surface, f.player.play_scene(Some(Scene::new("s1")), true)).await;
        with_auto_clicks(&f.surface, f.player.play_scene(Some(Scene::new("s2")), true)).await;

        assert_eq!(f.player.history().entries(), ["s1", "s2"]);
        assert!(f.surface.state().previous_enabled);
    }

    #[tokio::test]
    async fn test_play_without_push_leaves_history_alone() {
        let f = fixture();
        f.player.with_history(|h| h.replace(vec!["A".to_owned()]));

        with_auto_clicks(&f.surface, f.player.play_scene(Some(Scene::new("B")), false)).await;

        assert_eq!(f.player.history().entries(), ["A"]);
        assert_eq!(f.surface.state().scene_id.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_change_sprite_for_unknown_character_still_completes() {
        // Arrange
        let f = fixture();
        let mut scene = scene_with_line("s1", "Hi.");
        scene.dialogue.insert(
            0,
            command(StageCommand::ChangeSprite {
                character: "Ghost".to_owned(),
                sprite: "ghost.png".to_owned(),
            }),
        );

        // Act
        let report = with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        // Assert
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(report.commands_skipped, 1);
        assert_eq!(report.final_state(), Some(PlaybackState::Idle));
    }

    #[tokio::test]
    async fn test_add_then_remove_same_character_leaves_no_one_on_stage() {
        let f = fixture();
        let mut scene = Scene::new("s1");
        scene.dialogue = vec![
            command(StageCommand::AddCharacter {
                character: Character::new("Mai", "mai.png", Position::Left),
            }),
            command(StageCommand::RemoveCharacter {
                character_name: "Mai".to_owned(),
            }),
        ];

        let report = with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(report.commands_applied, 2);
        assert!(f.surface.state().characters.is_empty());
    }

    #[tokio::test]
    async fn test_opening_characters_are_revealed_after_entry_delay() {
        // Arrange
        let f = fixture();
        let mut scene = Scene::new("s1");
        scene.background = Some("park.png".to_owned());
        scene.characters = vec![Character::new("Алиса", "alice.png", Position::Left)];

        // Act
        with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        // Assert
        let calls = f.surface.calls();
        let placed = calls
            .iter()
            .position(|c| matches!(c, SurfaceCall::PlaceCharacter { visible: false, .. }))
            .unwrap();
        let revealed = calls
            .iter()
            .position(|c| matches!(c, SurfaceCall::SetCharacterVisible { visible: true, .. }))
            .unwrap();
        assert!(placed < revealed);
        assert_eq!(f.delay.count_of(Duration::from_millis(100)), 1);
        let state = f.surface.state();
        assert_eq!(state.background.as_deref(), Some("assets/park.png"));
        assert!(state.characters[0].visible);
        assert_eq!(state.characters[0].sprite, "assets/alice.png");
    }

    #[tokio::test]
    async fn test_scene_without_choices_hides_choice_area() {
        let f = fixture();

        let scene = scene_with_line("end", "Fin.");

        let report = with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        assert_eq!(report.choices_shown, 0);
        assert_eq!(f.surface.count_calls(|c| *c == SurfaceCall::HideChoices), 1);
        assert_eq!(f.surface.state().choices, None);
    }

    #[tokio::test]
    async fn test_missing_fade_completion_times_out_and_playback_continues() {
        let config = PlaybackConfig {
            transition_timeout_ms: 5,
            ..PlaybackConfig::default()
        };
        let f = fixture_with(
            RecordingSurface::without_transitions(),
            RecordingAudio::new(),
            config,
        );

        let scene = scene_with_line("s1", "Hi.");

        let report = with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        assert_eq!(report.outcome, PlaybackOutcome::Completed);
    }

    #[tokio::test]
    async fn test_new_playback_supersedes_one_waiting_for_a_click() {
        // Arrange
        let f = fixture();
        let first_scene = scene_with_line("a", "Waiting...");
        let mut second_scene = scene_with_line("b", "Next.");
        second_scene.choices.push(Choice::new("Go", "c"));

        // Act
        let first = f.player.play_scene(Some(first_scene), true);
        let second = async {
            while f.surface.count_calls(|c| matches!(c, SurfaceCall::CompleteLine(_))) == 0 {
                tokio::task::yield_now().await;
            }
            with_auto_clicks(&f.surface, f.player.play_scene(Some(second_scene), true)).await
        };
        let (first, second) = tokio::join!(first, second);

        // Assert
        assert_eq!(first.outcome, PlaybackOutcome::Superseded);
        assert_eq!(first.final_state(), Some(PlaybackState::PlayingLine));
        assert_eq!(second.outcome, PlaybackOutcome::Completed);
        assert_eq!(f.surface.listener_count(), 0);
        assert_eq!(
            f.surface.count_calls(|c| matches!(c, SurfaceCall::AttachOverlay(_))),
            f.surface.count_calls(|c| matches!(c, SurfaceCall::DetachOverlay(_))),
        );
        assert_eq!(f.surface.state().scene_id.as_deref(), Some("b"));
        assert_eq!(f.player.history().entries(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_overlay_click_resumes_music_and_warns_when_blocked() {
        // Arrange
        let f = fixture_with(
            RecordingSurface::new(),
            RecordingAudio::blocking_autoplay(),
            PlaybackConfig::default(),
        );

        let scene = scene_with_line("s1", "Hi.");

        // Act
        with_auto_clicks(&f.surface, f.player.play_scene(Some(scene), true)).await;

        // Assert
        assert!(f.audio.resume_calls() > 0);
        assert!(!f.audio.is_playing());
        assert!(f.messages.severities().contains(&Severity::Warning));
        assert_eq!(f.messages.messages()[0].0, AUTOPLAY_BLOCKED_MESSAGE);
    }
}
