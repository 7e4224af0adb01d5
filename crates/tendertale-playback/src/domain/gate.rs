//! Click gate: the per-playback session state.
//!
//! One gate exists per `play_scene` call. It routes overlay clicks: while a
//! line is typing a click requests a skip, while playback waits for the
//! player a click releases the wait, otherwise the click is ignored. A new
//! playback supersedes the old gate, which discards any pending wait.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What the gate is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Neither typing nor waiting; clicks are ignored.
    Idle,
    /// A line is being typed; clicks request a skip.
    Typing,
    /// Playback waits for a click to continue.
    AwaitingAdvance,
}

/// How a click was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The click asked the typing animation to skip.
    SkipRequested,
    /// The click released a pending advance wait.
    Advanced,
    /// Nothing was waiting for the click.
    Ignored,
}

/// How an advance wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The player clicked.
    Advanced,
    /// The gate was superseded by a newer playback before a click arrived.
    Abandoned,
}

#[derive(Debug)]
struct GateState {
    phase: GatePhase,
    skip_requested: bool,
    superseded: bool,
    pending: Option<oneshot::Sender<()>>,
}

/// Single-slot rendezvous between playback and overlay clicks.
#[derive(Debug)]
pub struct ClickGate {
    state: Mutex<GateState>,
}

impl Default for ClickGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickGate {
    /// Creates an idle gate with no pending wait.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                phase: GatePhase::Idle,
                skip_requested: false,
                superseded: false,
                pending: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current phase.
    pub fn phase(&self) -> GatePhase {
        self.lock().phase
    }

    /// Whether a line is being typed.
    pub fn is_typing(&self) -> bool {
        self.phase() == GatePhase::Typing
    }

    /// Whether an advance wait is outstanding.
    pub fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Whether a skip was requested for the line being typed.
    pub fn skip_requested(&self) -> bool {
        self.lock().skip_requested
    }

    /// Whether a newer playback has taken over.
    pub fn is_superseded(&self) -> bool {
        self.lock().superseded
    }

    /// Enters the typing phase with a cleared skip request.
    pub fn begin_typing(&self) {
        let mut state = self.lock();
        state.phase = GatePhase::Typing;
        state.skip_requested = false;
    }

    /// Leaves the typing phase. Returns `true` only for the call that
    /// actually ended typing, so repeated finishes are harmless.
    pub fn finish_typing(&self) -> bool {
        let mut state = self.lock();
        if state.phase != GatePhase::Typing {
            return false;
        }
        state.phase = GatePhase::Idle;
        state.skip_requested = false;
        true
    }

    /// Waits for the next overlay click.
    ///
    /// Arming a second wait while one is pending is a sequencing bug; the
    /// stale wait is discarded (it resolves as [`Advance::Abandoned`]) and a
    /// warning is logged. A superseded gate resolves immediately as
    /// abandoned.
    pub async fn wait_for_advance(&self) -> Advance {
        let receiver = {
            let mut state = self.lock();
            if state.superseded {
                return Advance::Abandoned;
            }
            if state.pending.take().is_some() {
                warn!("advance wait armed while another was pending; discarding the stale wait");
            }
            let (sender, receiver) = oneshot::channel();
            state.pending = Some(sender);
            state.phase = GatePhase::AwaitingAdvance;
            receiver
        };
        match receiver.await {
            Ok(()) => Advance::Advanced,
            Err(_) => Advance::Abandoned,
        }
    }

    /// Routes one overlay click according to the current phase.
    pub fn signal_advance(&self) -> Signal {
        let mut state = self.lock();
        if state.superseded {
            return Signal::Ignored;
        }
        match state.phase {
            GatePhase::Typing => {
                state.skip_requested = true;
                Signal::SkipRequested
            }
            GatePhase::AwaitingAdvance => {
                state.phase = GatePhase::Idle;
                match state.pending.take() {
                    Some(sender) => {
                        // The waiter may already be gone; there is nothing to release then.
                        let _ = sender.send(());
                        Signal::Advanced
                    }
                    None => Signal::Ignored,
                }
            }
            GatePhase::Idle => Signal::Ignored,
        }
    }

    /// Marks the gate as belonging to an abandoned playback: the pending
    /// wait, if any, resolves as [`Advance::Abandoned`], flags are cleared
    /// and every later click is ignored.
    pub fn supersede(&self) {
        let mut state = self.lock();
        if state.superseded {
            return;
        }
        state.superseded = true;
        state.phase = GatePhase::Idle;
        state.skip_requested = false;
        if state.pending.take().is_some() {
            debug!("discarded pending advance wait of superseded playback");
        }
    }
}
