//! Player-facing collaborators that live outside the playback core.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default time a toast stays on screen.
pub const DEFAULT_MESSAGE_DURATION: Duration = Duration::from_millis(3000);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// An action succeeded.
    Success,
    /// Something the player should notice but can ignore.
    Warning,
    /// An action failed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Fire-and-forget message display. Never awaited by the engine.
pub trait MessageDisplay: Send + Sync {
    /// Show `text` for `duration`.
    fn display(&self, text: &str, severity: Severity, duration: Duration);
}

/// Audio playback refused by the host (for example blocked autoplay).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audio playback refused: {0}")]
pub struct AudioError(pub String);

/// Background music controls, independent of playback state.
pub trait AudioControls: Send + Sync {
    /// Play when paused, pause when playing. Returns whether music now plays.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the host refuses to start playback.
    fn toggle(&self) -> Result<bool, AudioError>;

    /// Flip the mute flag. Returns whether audio is now muted.
    fn mute(&self) -> bool;

    /// Start music if it is paused; called on every player interaction.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the host refuses to start playback.
    fn resume_if_paused(&self) -> Result<(), AudioError>;
}

/// Audio controls for hosts without audio output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioControls for SilentAudio {
    fn toggle(&self) -> Result<bool, AudioError> {
        Ok(false)
    }

    fn mute(&self) -> bool {
        true
    }

    fn resume_if_paused(&self) -> Result<(), AudioError> {
        Ok(())
    }
}
