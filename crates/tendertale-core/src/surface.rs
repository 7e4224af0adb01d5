//! Render surface port.
//!
//! The playback engine never touches a concrete display. It drives a
//! [`RenderSurface`], which a host implements on top of whatever it renders
//! to (a DOM, a terminal, a test recorder). All calls are synchronous: a
//! surface applies the change and returns, and reports the end of any visual
//! transition it started through [`RenderSurface::subscribe_transitions`].

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::scene::{Choice, Position};

/// CSS-style property name used by stage fades.
pub const OPACITY: &str = "opacity";

/// A speaker name together with the color it is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabel {
    /// Speaker name as written in the script.
    pub name: String,
    /// Display color, e.g. `#FFD700`.
    pub color: String,
}

/// Destination of typed dialogue text.
pub trait TextSink: Send + Sync {
    /// Clear the dialogue area and write the speaker label, if any.
    fn begin_line(&self, speaker: Option<&SpeakerLabel>);

    /// Append one character of the current line.
    fn push_char(&self, ch: char);

    /// Replace the dialogue area with the label and the complete line.
    fn complete_line(&self, speaker: Option<&SpeakerLabel>, text: &str);
}

/// Element whose visual transition finished.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionTarget {
    /// The whole stage (scene fades).
    Stage,
    /// A character sprite, by name (entry slides).
    Character(String),
}

impl fmt::Display for TransitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage => f.write_str("stage"),
            Self::Character(name) => write!(f, "character:{name}"),
        }
    }
}

/// Notification that a visual transition finished on `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    /// The element that finished transitioning.
    pub target: TransitionTarget,
    /// The transitioned property, e.g. `opacity`.
    pub property: String,
}

impl TransitionEvent {
    /// Creates an event for `target` and `property`.
    #[must_use]
    pub fn new(target: TransitionTarget, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }
}

/// Callback invoked on every click of the dialogue overlay.
pub type OverlayHandler = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`RenderSurface::attach_overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Display operations the playback engine needs from a host.
pub trait RenderSurface: TextSink {
    /// Start fading the stage out. Completion is reported as a
    /// [`TransitionEvent`] on [`TransitionTarget::Stage`].
    fn fade_out(&self);

    /// Start fading the stage in. Completion is reported like `fade_out`.
    fn fade_in(&self);

    /// Replace the stage contents with a fresh structural layout for
    /// `scene_id`: menu, character container, dialogue area with its click
    /// overlay, and a hidden choice area.
    fn build_stage(&self, scene_id: &str);

    /// Set the background image, or clear it when `None`.
    fn set_background(&self, image: Option<&str>);

    /// Enable or disable the "previous scene" menu action.
    fn set_previous_enabled(&self, enabled: bool);

    /// Put a character sprite on stage.
    fn place_character(&self, name: &str, sprite: &str, position: &Position, visible: bool);

    /// Show or hide a placed character; showing triggers its entry transition.
    fn set_character_visible(&self, name: &str, visible: bool);

    /// Swap the sprite of a placed character.
    fn set_character_sprite(&self, name: &str, sprite: &str);

    /// Remove a placed character.
    fn remove_character(&self, name: &str);

    /// Render the choices as actionable controls and show the choice area.
    fn show_choices(&self, choices: &[Choice]);

    /// Hide the choice area.
    fn hide_choices(&self);

    /// Show or hide the dialogue click overlay.
    fn set_overlay_visible(&self, visible: bool);

    /// Register a click listener on the dialogue overlay.
    fn attach_overlay(&self, handler: OverlayHandler) -> ListenerId;

    /// Remove a listener registered with `attach_overlay`. Unknown ids are
    /// ignored.
    fn detach_overlay(&self, id: ListenerId);

    /// Subscribe to transition-end notifications. Only events sent after
    /// this call are received.
    fn subscribe_transitions(&self) -> broadcast::Receiver<TransitionEvent>;
}
