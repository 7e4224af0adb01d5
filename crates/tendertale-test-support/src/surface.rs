//! Test surface: a `RenderSurface` that records every call and keeps a
//! snapshot of what a player would currently see.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tendertale_core::scene::{Choice, Position};
use tendertale_core::surface::{
    ListenerId, OPACITY, OverlayHandler, RenderSurface, SpeakerLabel, TextSink, TransitionEvent,
    TransitionTarget,
};
use tokio::sync::broadcast;

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `fade_out` was called.
    FadeOut,
    /// `fade_in` was called.
    FadeIn,
    /// `build_stage` was called for a scene id.
    BuildStage(String),
    /// `set_background` was called.
    SetBackground(Option<String>),
    /// `set_previous_enabled` was called.
    SetPreviousEnabled(bool),
    /// `place_character` was called.
    PlaceCharacter {
        /// Character name.
        name: String,
        /// Sprite path.
        sprite: String,
        /// Whether it was placed visible.
        visible: bool,
    },
    /// `set_character_visible` was called.
    SetCharacterVisible {
        /// Character name.
        name: String,
        /// New visibility.
        visible: bool,
    },
    /// `set_character_sprite` was called.
    SetCharacterSprite {
        /// Character name.
        name: String,
        /// New sprite path.
        sprite: String,
    },
    /// `remove_character` was called.
    RemoveCharacter(String),
    /// `show_choices` was called with these labels.
    ShowChoices(Vec<String>),
    /// `hide_choices` was called.
    HideChoices,
    /// `set_overlay_visible` was called.
    SetOverlayVisible(bool),
    /// A listener was attached.
    AttachOverlay(ListenerId),
    /// A listener was detached.
    DetachOverlay(ListenerId),
    /// `begin_line` was called with this speaker name.
    BeginLine(Option<String>),
    /// `push_char` was called.
    PushChar(char),
    /// `complete_line` was called with this text.
    CompleteLine(String),
}

/// A character as currently shown on the recorded stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCharacter {
    /// Character name.
    pub name: String,
    /// Sprite path.
    pub sprite: String,
    /// Stage position.
    pub position: Position,
    /// Whether the sprite is visible.
    pub visible: bool,
}

/// What the recorded stage currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    /// Scene id of the last built stage.
    pub scene_id: Option<String>,
    /// Current background image.
    pub background: Option<String>,
    /// Whether "previous scene" is enabled.
    pub previous_enabled: bool,
    /// Characters on stage, in placement order.
    pub characters: Vec<StagedCharacter>,
    /// Shown choice labels; `None` while the choice area is hidden.
    pub choices: Option<Vec<String>>,
    /// Whether the dialogue overlay is visible.
    pub overlay_visible: bool,
    /// Speaker of the line in the dialogue area.
    pub speaker: Option<SpeakerLabel>,
    /// Text of the line in the dialogue area, without the speaker label.
    pub text: String,
}

/// A render surface that records calls and state.
///
/// Fades complete immediately: `fade_out` and `fade_in` publish an
/// `opacity` transition-end event for the stage unless the surface was built
/// with [`RecordingSurface::without_transitions`].
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    state: Mutex<SurfaceState>,
    listeners: Mutex<Vec<(ListenerId, OverlayHandler)>>,
    next_listener: AtomicU64,
    transitions: broadcast::Sender<TransitionEvent>,
    emit_transitions: bool,
}

impl std::fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("state", &self.state)
            .field("listener_count", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Creates a surface whose fades complete immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::with_emission(true)
    }

    /// Creates a surface that never reports transition ends on its own;
    /// tests publish them with [`RecordingSurface::emit_transition`].
    #[must_use]
    pub fn without_transitions() -> Self {
        Self::with_emission(false)
    }

    fn with_emission(emit_transitions: bool) -> Self {
        let (transitions, _) = broadcast::channel(64);
        Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(SurfaceState::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            transitions,
            emit_transitions,
        }
    }

    /// Publishes a transition-end event to current subscribers.
    pub fn emit_transition(&self, event: TransitionEvent) {
        let _ = self.transitions.send(event);
    }

    /// Clicks the dialogue overlay, invoking every attached listener.
    /// Returns how many listeners ran.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn click(&self) -> usize {
        let handlers: Vec<OverlayHandler> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    /// Returns the number of attached overlay listeners.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns how many calls were recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns how many recorded calls satisfy `predicate`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn count_calls(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Returns a snapshot of the displayed state.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn state(&self) -> SurfaceState {
        self.state.lock().unwrap().clone()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn update(&self, f: impl FnOnce(&mut SurfaceState)) {
        f(&mut self.state.lock().unwrap());
    }

    fn fade(&self) {
        if self.emit_transitions {
            self.emit_transition(TransitionEvent::new(TransitionTarget::Stage, OPACITY));
        }
    }
}

impl TextSink for RecordingSurface {
    fn begin_line(&self, speaker: Option<&SpeakerLabel>) {
        self.record(SurfaceCall::BeginLine(speaker.map(|s| s.name.clone())));
        self.update(|state| {
            state.speaker = speaker.cloned();
            state.text.clear();
        });
    }

    fn push_char(&self, ch: char) {
        self.record(SurfaceCall::PushChar(ch));
        self.update(|state| state.text.push(ch));
    }

    fn complete_line(&self, speaker: Option<&SpeakerLabel>, text: &str) {
        self.record(SurfaceCall::CompleteLine(text.to_owned()));
        self.update(|state| {
            state.speaker = speaker.cloned();
            text.clone_into(&mut state.text);
        });
    }
}

impl RenderSurface for RecordingSurface {
    fn fade_out(&self) {
        self.record(SurfaceCall::FadeOut);
        self.fade();
    }

    fn fade_in(&self) {
        self.record(SurfaceCall::FadeIn);
        self.fade();
    }

    fn build_stage(&self, scene_id: &str) {
        self.record(SurfaceCall::BuildStage(scene_id.to_owned()));
        self.update(|state| {
            *state = SurfaceState {
                scene_id: Some(scene_id.to_owned()),
                background: state.background.take(),
                overlay_visible: true,
                ..SurfaceState::default()
            };
        });
    }

    fn set_background(&self, image: Option<&str>) {
        self.record(SurfaceCall::SetBackground(image.map(str::to_owned)));
        self.update(|state| state.background = image.map(str::to_owned));
    }

    fn set_previous_enabled(&self, enabled: bool) {
        self.record(SurfaceCall::SetPreviousEnabled(enabled));
        self.update(|state| state.previous_enabled = enabled);
    }

    fn place_character(&self, name: &str, sprite: &str, position: &Position, visible: bool) {
        self.record(SurfaceCall::PlaceCharacter {
            name: name.to_owned(),
            sprite: sprite.to_owned(),
            visible,
        });
        self.update(|state| {
            state.characters.push(StagedCharacter {
                name: name.to_owned(),
                sprite: sprite.to_owned(),
                position: position.clone(),
                visible,
            });
        });
    }

    fn set_character_visible(&self, name: &str, visible: bool) {
        self.record(SurfaceCall::SetCharacterVisible {
            name: name.to_owned(),
            visible,
        });
        self.update(|state| {
            if let Some(character) = state.characters.iter_mut().find(|c| c.name == name) {
                character.visible = visible;
            }
        });
    }

    fn set_character_sprite(&self, name: &str, sprite: &str) {
        self.record(SurfaceCall::SetCharacterSprite {
            name: name.to_owned(),
            sprite: sprite.to_owned(),
        });
        self.update(|state| {
            if let Some(character) = state.characters.iter_mut().find(|c| c.name == name) {
                sprite.clone_into(&mut character.sprite);
            }
        });
    }

    fn remove_character(&self, name: &str) {
        self.record(SurfaceCall::RemoveCharacter(name.to_owned()));
        self.update(|state| {
            if let Some(index) = state.characters.iter().position(|c| c.name == name) {
                state.characters.remove(index);
            }
        });
    }

    fn show_choices(&self, choices: &[Choice]) {
        let labels: Vec<String> = choices.iter().map(|c| c.text.clone()).collect();
        self.record(SurfaceCall::ShowChoices(labels.clone()));
        self.update(|state| state.choices = Some(labels));
    }

    fn hide_choices(&self) {
        self.record(SurfaceCall::HideChoices);
        self.update(|state| state.choices = None);
    }

    fn set_overlay_visible(&self, visible: bool) {
        self.record(SurfaceCall::SetOverlayVisible(visible));
        self.update(|state| state.overlay_visible = visible);
    }

    fn attach_overlay(&self, handler: OverlayHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.record(SurfaceCall::AttachOverlay(id));
        self.listeners.lock().unwrap().push((id, handler));
        id
    }

    fn detach_overlay(&self, id: ListenerId) {
        self.record(SurfaceCall::DetachOverlay(id));
        self.listeners.lock().unwrap().retain(|(existing, _)| *existing != id);
    }

    fn subscribe_transitions(&self) -> broadcast::Receiver<TransitionEvent> {
        self.transitions.subscribe()
    }
}

/// Drives `future` to completion, clicking the overlay of `surface` every
/// time the future suspends. On a current-thread runtime this behaves like a
/// player who clicks as fast as possible: every typing animation is skipped
/// at its first pending character and every advance wait resolves at once.
pub async fn with_auto_clicks<F: Future>(surface: &RecordingSurface, future: F) -> F::Output {
    tokio::pin!(future);
    loop {
        tokio::select! {
            biased;
            output = &mut future => return output,
            () = tokio::task::yield_now() => {
                surface.click();
            }
        }
    }
}

/// Number of consecutive polls without a new surface call after which a
/// driven playback counts as blocked.
const STALL_POLLS: usize = 64;

/// Drives `future` to completion like a player who only clicks once nothing
/// moves on screen. Typing, fades and settle delays run without clicks; a
/// click is sent only after the future stayed pending for a while without
/// recording any surface call. Returns the output together with the number of
/// clicks that were needed.
pub async fn with_clicks_when_blocked<F: Future>(
    surface: &RecordingSurface,
    future: F,
) -> (F::Output, usize) {
    tokio::pin!(future);
    let mut clicks = 0;
    let mut idle_polls = 0;
    let mut seen_calls = surface.call_count();
    loop {
        tokio::select! {
            biased;
            output = &mut future => return (output, clicks),
            () = tokio::task::yield_now() => {
                let calls = surface.call_count();
                if calls == seen_calls {
                    idle_polls += 1;
                } else {
                    seen_calls = calls;
                    idle_polls = 0;
                }
                if idle_polls >= STALL_POLLS {
                    surface.click();
                    clicks += 1;
                    idle_polls = 0;
                }
            }
        }
    }
}
