//! Message and audio recorders for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tendertale_core::presentation::{AudioControls, AudioError, MessageDisplay, Severity};

/// Records every displayed message.
#[derive(Debug, Default)]
pub struct RecordingMessages {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingMessages {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message displayed so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    /// Returns the severities of all displayed messages, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn severities(&self) -> Vec<Severity> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, severity)| *severity)
            .collect()
    }
}

impl MessageDisplay for RecordingMessages {
    fn display(&self, text: &str, severity: Severity, _duration: Duration) {
        self.messages.lock().unwrap().push((text.to_owned(), severity));
    }
}

/// Audio controls that count interactions and can simulate blocked
/// autoplay.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    playing: AtomicBool,
    muted: AtomicBool,
    block_autoplay: AtomicBool,
    resume_calls: AtomicUsize,
}

impl RecordingAudio {
    /// Creates paused, unmuted audio that allows playback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates audio whose host refuses to start playback.
    #[must_use]
    pub fn blocking_autoplay() -> Self {
        let audio = Self::default();
        audio.block_autoplay.store(true, Ordering::SeqCst);
        audio
    }

    /// Returns how many times `resume_if_paused` was called.
    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    /// Returns whether music is playing.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn start(&self) -> Result<(), AudioError> {
        if self.block_autoplay.load(Ordering::SeqCst) {
            return Err(AudioError("autoplay blocked".into()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl AudioControls for RecordingAudio {
    fn toggle(&self) -> Result<bool, AudioError> {
        if self.playing.load(Ordering::SeqCst) {
            self.playing.store(false, Ordering::SeqCst);
            return Ok(false);
        }
        self.start()?;
        Ok(true)
    }

    fn mute(&self) -> bool {
        !self.muted.fetch_xor(true, Ordering::SeqCst)
    }

    fn resume_if_paused(&self) -> Result<(), AudioError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        if self.playing.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.start()
    }
}
