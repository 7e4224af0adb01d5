//! Typing animator.
//!
//! Writes one line of dialogue to a [`TextSink`] a character at a time. A
//! click on the overlay while typing (routed through the [`ClickGate`])
//! finishes the line at once. The animator never waits for a click itself;
//! that is the engine's job once the line is on screen.

use std::collections::HashMap;
use std::time::Duration;

use tendertale_core::clock::Delay;
use tendertale_core::surface::{SpeakerLabel, TextSink};

use crate::config::PlaybackConfig;
use crate::domain::gate::ClickGate;

/// Maps speaker names to label colors.
#[derive(Debug, Clone)]
pub struct SpeakerPalette {
    colors: HashMap<String, String>,
    default_color: String,
}

impl SpeakerPalette {
    /// Builds the palette from playback configuration.
    #[must_use]
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            colors: config.speaker_colors.clone(),
            default_color: config.default_speaker_color.clone(),
        }
    }

    /// Label for `speaker`; unknown speakers get the default color.
    #[must_use]
    pub fn label(&self, speaker: &str) -> SpeakerLabel {
        let color = self
            .colors
            .get(speaker)
            .unwrap_or(&self.default_color)
            .clone();
        SpeakerLabel {
            name: speaker.to_owned(),
            color,
        }
    }
}

/// How a typed line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTyped {
    /// Every character was typed at the configured pace.
    Completed,
    /// A click skipped the rest of the animation; the full text is shown.
    Skipped,
    /// A newer playback took over mid-line; nothing more was written.
    Superseded,
}

/// Ends the typing phase exactly once, even when the typing future is
/// dropped halfway through.
struct TypingPhase<'a> {
    gate: &'a ClickGate,
    open: bool,
}

impl TypingPhase<'_> {
    fn finish(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.gate.finish_typing()
    }
}

impl Drop for TypingPhase<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Character-by-character text renderer for one playback.
pub struct TypingAnimator<'a> {
    sink: &'a dyn TextSink,
    delay: &'a dyn Delay,
    gate: &'a ClickGate,
    speed: Duration,
}

impl<'a> TypingAnimator<'a> {
    /// Creates an animator writing to `sink` at one character per `speed`.
    #[must_use]
    pub fn new(
        sink: &'a dyn TextSink,
        delay: &'a dyn Delay,
        gate: &'a ClickGate,
        speed: Duration,
    ) -> Self {
        Self {
            sink,
            delay,
            gate,
            speed,
        }
    }

    /// Types `text` under an optional speaker label.
    ///
    /// The label appears immediately. Before every character after the first
    /// the animator checks for a skip request; on skip the full line is
    /// written and the call returns. The sink sees exactly one
    /// `complete_line` per line that was not superseded.
    pub async fn type_line(&self, speaker: Option<&SpeakerLabel>, text: &str) -> LineTyped {
        self.gate.begin_typing();
        let mut phase = TypingPhase {
            gate: self.gate,
            open: true,
        };
        self.sink.begin_line(speaker);

        let mut outcome = LineTyped::Completed;
        for (index, ch) in text.chars().enumerate() {
            if index > 0 {
                self.delay.sleep(self.speed).await;
                if self.gate.is_superseded() {
                    phase.finish();
                    return LineTyped::Superseded;
                }
                if self.gate.skip_requested() {
                    outcome = LineTyped::Skipped;
                    break;
                }
            }
            self.sink.push_char(ch);
        }

        if phase.finish() {
            self.sink.complete_line(speaker, text);
        }
        outcome
    }
}
