//! Terminal rendering of the stage.
//!
//! [`TerminalSurface`] prints dialogue, stage directions and choices as plain
//! lines of text, coloring speaker labels with 24-bit ANSI escapes. Fades have
//! no visual effect in a terminal but still report completion after the
//! configured fade duration, so playback paces itself the same way it would on
//! a graphical host.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tendertale_core::presentation::{MessageDisplay, Severity};
use tendertale_core::scene::{Choice, Position};
use tendertale_core::surface::{
    ListenerId, OPACITY, OverlayHandler, RenderSurface, SpeakerLabel, TextSink, TransitionEvent,
    TransitionTarget,
};
use tokio::sync::broadcast;
use tracing::debug;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";

/// Output sink shared by the surface and the message display.
pub type Output = Box<dyn Write + Send>;

/// Converts `#rgb` or `#rrggbb` into a 24-bit foreground escape sequence.
/// Returns `None` for anything else.
#[must_use]
pub fn ansi_color(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match digits.len() {
        3 => {
            let mut expanded = digits.chars().map(|c| channel(&format!("{c}{c}")));
            (expanded.next()??, expanded.next()??, expanded.next()??)
        }
        6 => (
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        ),
        _ => return None,
    };
    Some(format!("\x1b[38;2;{r};{g};{b}m"))
}

fn speaker_prefix(speaker: Option<&SpeakerLabel>) -> String {
    speaker.map_or_else(String::new, |label| match ansi_color(&label.color) {
        Some(color) => format!("{BOLD}{color}{}{RESET}: ", label.name),
        None => format!("{BOLD}{}{RESET}: ", label.name),
    })
}

#[derive(Debug, Default)]
struct LineState {
    open: bool,
    typed: String,
}

/// A render surface that writes to a terminal.
pub struct TerminalSurface {
    out: Mutex<Output>,
    line: Mutex<LineState>,
    listeners: Mutex<Vec<(ListenerId, OverlayHandler)>>,
    next_listener: AtomicU64,
    transitions: broadcast::Sender<TransitionEvent>,
    fade_duration: Duration,
}

impl std::fmt::Debug for TerminalSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("fade_duration", &self.fade_duration)
            .finish_non_exhaustive()
    }
}

impl TerminalSurface {
    /// Creates a surface writing to `out` whose fades report completion
    /// after `fade_duration`.
    #[must_use]
    pub fn new(out: Output, fade_duration: Duration) -> Self {
        let (transitions, _) = broadcast::channel(16);
        Self {
            out: Mutex::new(out),
            line: Mutex::new(LineState::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            transitions,
            fade_duration,
        }
    }

    /// Creates a surface on standard output.
    #[must_use]
    pub fn stdout(fade_duration: Duration) -> Self {
        Self::new(Box::new(io::stdout()), fade_duration)
    }

    /// Clicks the dialogue overlay. Returns how many listeners ran.
    pub fn click(&self) -> usize {
        let handlers: Vec<OverlayHandler> = lock(&self.listeners)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    /// Whether any overlay listener is attached, i.e. a scene is waiting for
    /// clicks.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        !lock(&self.listeners).is_empty()
    }

    fn write(&self, f: impl FnOnce(&mut Output) -> io::Result<()>) {
        let mut out = lock(&self.out);
        if let Err(e) = f(&mut out).and_then(|()| out.flush()) {
            debug!(error = %e, "terminal write failed");
        }
    }

    fn direction(&self, text: &str) {
        self.close_line();
        self.write(|out| writeln!(out, "{DIM}[{text}]{RESET}"));
    }

    fn close_line(&self) {
        let mut line = lock(&self.line);
        if line.open {
            line.open = false;
            line.typed.clear();
            drop(line);
            self.write(|out| writeln!(out));
        }
    }

    fn fade(&self) {
        let event = TransitionEvent::new(TransitionTarget::Stage, OPACITY);
        if self.fade_duration.is_zero() {
            let _ = self.transitions.send(event);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let transitions = self.transitions.clone();
                let duration = self.fade_duration;
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    let _ = transitions.send(event);
                });
            }
            Err(_) => {
                let _ = self.transitions.send(event);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TextSink for TerminalSurface {
    fn begin_line(&self, speaker: Option<&SpeakerLabel>) {
        self.close_line();
        {
            let mut line = lock(&self.line);
            line.open = true;
            line.typed.clear();
        }
        let prefix = speaker_prefix(speaker);
        self.write(|out| write!(out, "{prefix}"));
    }

    fn push_char(&self, ch: char) {
        lock(&self.line).typed.push(ch);
        self.write(|out| write!(out, "{ch}"));
    }

    fn complete_line(&self, speaker: Option<&SpeakerLabel>, text: &str) {
        let mut line = lock(&self.line);
        let remainder = if line.open {
            text.strip_prefix(line.typed.as_str()).map(str::to_owned)
        } else {
            None
        };
        line.open = false;
        line.typed.clear();
        drop(line);

        match remainder {
            Some(rest) => self.write(|out| writeln!(out, "{rest}")),
            None => {
                let prefix = speaker_prefix(speaker);
                self.write(|out| writeln!(out, "\r{prefix}{text}"));
            }
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn fade_out(&self) {
        self.fade();
    }

    fn fade_in(&self) {
        self.fade();
    }

    fn build_stage(&self, scene_id: &str) {
        self.close_line();
        self.write(|out| writeln!(out, "\n{BOLD}== {scene_id} =={RESET}"));
    }

    fn set_background(&self, image: Option<&str>) {
        if let Some(image) = image {
            self.direction(&format!("background: {image}"));
        }
    }

    fn set_previous_enabled(&self, enabled: bool) {
        debug!(enabled, "previous scene action toggled");
    }

    fn place_character(&self, name: &str, sprite: &str, position: &Position, visible: bool) {
        debug!(name, sprite, %position, visible, "character placed");
        if visible {
            self.direction(&format!("{name} stands {position}"));
        }
    }

    fn set_character_visible(&self, name: &str, visible: bool) {
        if visible {
            self.direction(&format!("{name} enters"));
        } else {
            self.direction(&format!("{name} steps out of view"));
        }
    }

    fn set_character_sprite(&self, name: &str, sprite: &str) {
        debug!(name, sprite, "sprite changed");
    }

    fn remove_character(&self, name: &str) {
        self.direction(&format!("{name} leaves"));
    }

    fn show_choices(&self, choices: &[Choice]) {
        self.close_line();
        self.write(|out| {
            writeln!(out)?;
            for (index, choice) in choices.iter().enumerate() {
                writeln!(out, "  {}) {}", index + 1, choice.text)?;
            }
            Ok(())
        });
    }

    fn hide_choices(&self) {}

    fn set_overlay_visible(&self, visible: bool) {
        debug!(visible, "overlay visibility changed");
    }

    fn attach_overlay(&self, handler: OverlayHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, handler));
        id
    }

    fn detach_overlay(&self, id: ListenerId) {
        lock(&self.listeners).retain(|(existing, _)| *existing != id);
    }

    fn subscribe_transitions(&self) -> broadcast::Receiver<TransitionEvent> {
        self.transitions.subscribe()
    }
}

/// Prints player-facing messages on their own line.
pub struct TerminalMessages {
    out: Mutex<Output>,
}

impl TerminalMessages {
    /// Creates a message display writing to `out`.
    #[must_use]
    pub fn new(out: Output) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Creates a message display on standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }
}

impl std::fmt::Debug for TerminalMessages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalMessages").finish_non_exhaustive()
    }
}

impl MessageDisplay for TerminalMessages {
    fn display(&self, text: &str, severity: Severity, _duration: Duration) {
        let color = match severity {
            Severity::Info => "#87CEEB",
            Severity::Success => "#7CFC00",
            Severity::Warning => "#FFA500",
            Severity::Error => "#FF4500",
        };
        let color = ansi_color(color).unwrap_or_default();
        let mut out = lock(&self.out);
        if let Err(e) = writeln!(out, "{color}* {text}{RESET}").and_then(|()| out.flush()) {
            debug!(error = %e, "message write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn surface() -> (TerminalSurface, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let surface = TerminalSurface::new(Box::new(buffer.clone()), Duration::ZERO);
        (surface, buffer)
    }

    fn label() -> SpeakerLabel {
        SpeakerLabel {
            name: "Mai".to_owned(),
            color: "#FFD700".to_owned(),
        }
    }

    #[test]
    fn test_ansi_color_parses_long_and_short_hex() {
        assert_eq!(ansi_color("#FFD700").as_deref(), Some("\x1b[38;2;255;215;0m"));
        assert_eq!(ansi_color("#fff").as_deref(), Some("\x1b[38;2;255;255;255m"));
        assert_eq!(ansi_color("gold"), None);
        assert_eq!(ansi_color("#12345"), None);
        assert_eq!(ansi_color("#zzzzzz"), None);
    }

    #[test]
    fn test_complete_line_prints_only_untyped_remainder() {
        // Arrange
        let (surface, buffer) = surface();
        surface.begin_line(Some(&label()));
        surface.push_char('H');
        surface.push_char('e');

        // Act
        surface.complete_line(Some(&label()), "Hello");

        // Assert
        let output = buffer.contents();
        assert!(output.contains("Mai"));
        assert!(output.ends_with("Hello\n"));
        assert_eq!(output.matches("He").count(), 1);
    }

    #[test]
    fn test_complete_line_without_open_line_prints_whole_line() {
        let (surface, buffer) = surface();

        surface.complete_line(None, "Silence.");

        assert!(buffer.contents().ends_with("Silence.\n"));
    }

    #[test]
    fn test_show_choices_numbers_from_one() {
        let (surface, buffer) = surface();

        surface.show_choices(&[
            Choice::new("Stay", "scene_2"),
            Choice::new("Leave", "scene_3"),
        ]);

        let output = buffer.contents();
        assert!(output.contains("  1) Stay\n"));
        assert!(output.contains("  2) Leave\n"));
    }

    #[test]
    fn test_click_runs_attached_listeners_until_detached() {
        // Arrange
        let (surface, _) = surface();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        let id = surface.attach_overlay(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        // Act
        assert_eq!(surface.click(), 1);
        surface.detach_overlay(id);
        let after_detach = surface.click();

        // Assert
        assert_eq!(after_detach, 0);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert!(!surface.has_listeners());
    }

    #[tokio::test]
    async fn test_fade_reports_stage_opacity_after_duration() {
        // Arrange
        let buffer = SharedBuffer::default();
        let surface = TerminalSurface::new(Box::new(buffer), Duration::from_millis(5));
        let mut events = surface.subscribe_transitions();

        // Act
        surface.fade_out();
        let event = events.recv().await.unwrap();

        // Assert
        assert_eq!(event, TransitionEvent::new(TransitionTarget::Stage, OPACITY));
    }

    #[test]
    fn test_messages_are_written_one_per_line() {
        let buffer = SharedBuffer::default();
        let messages = TerminalMessages::new(Box::new(buffer.clone()));

        messages.display("Game loaded!", Severity::Success, Duration::from_secs(3));

        let output = buffer.contents();
        assert!(output.contains("* Game loaded!"));
        assert!(output.ends_with('\n'));
    }
}
