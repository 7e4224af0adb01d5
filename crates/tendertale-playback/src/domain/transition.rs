//! Transition orchestrator.
//!
//! Waits for a render surface to report that a visual transition finished.
//! The subscription is taken before the transition is triggered, so a
//! surface that completes synchronously cannot be missed:
//!
//! ```ignore
//! let wait = transitions.arm(surface, TransitionTarget::Stage, Some(OPACITY));
//! surface.fade_out();
//! wait.completed().await;
//! ```

use std::time::Duration;

use tendertale_core::surface::{RenderSurface, TransitionEvent, TransitionTarget};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// How a transition wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The matching completion event arrived.
    Completed,
    /// No matching event arrived within the timeout.
    TimedOut,
    /// The surface stopped publishing events.
    Closed,
}

/// Creates transition waits with a common timeout.
#[derive(Debug, Clone, Copy)]
pub struct TransitionOrchestrator {
    timeout: Duration,
}

impl TransitionOrchestrator {
    /// Creates an orchestrator that gives up on a transition after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Registers interest in the next completion on `target`, optionally
    /// restricted to one transitioned property. Call before triggering the
    /// transition.
    pub fn arm(
        &self,
        surface: &dyn RenderSurface,
        target: TransitionTarget,
        property: Option<&str>,
    ) -> TransitionWait {
        TransitionWait {
            receiver: surface.subscribe_transitions(),
            target,
            property: property.map(str::to_owned),
            timeout: self.timeout,
        }
    }
}

/// A registered, not yet fired, transition listener. Dropping it
/// deregisters the listener.
#[derive(Debug)]
pub struct TransitionWait {
    receiver: broadcast::Receiver<TransitionEvent>,
    target: TransitionTarget,
    property: Option<String>,
    timeout: Duration,
}

impl TransitionWait {
    fn matches(&self, event: &TransitionEvent) -> bool {
        event.target == self.target
            && self
                .property
                .as_deref()
                .is_none_or(|property| property == event.property)
    }

    /// Resolves once with the first matching completion event, then
    /// deregisters.
    pub async fn completed(mut self) -> TransitionOutcome {
        let timeout = self.timeout;
        let wait = async {
            loop {
                match self.receiver.recv().await {
                    Ok(event) if self.matches(&event) => return TransitionOutcome::Completed,
                    Ok(event) => {
                        debug!(
                            target_element = %event.target,
                            property = %event.property,
                            "ignoring unrelated transition"
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "transition listener lagged");
                    }
                    Err(RecvError::Closed) => return TransitionOutcome::Closed,
                }
            }
        };
        let result = tokio::time::timeout(timeout, wait).await;
        result.unwrap_or_else(|_| {
            warn!(
                target_element = %self.target,
                ?timeout,
                "transition did not report completion, continuing"
            );
            TransitionOutcome::TimedOut
        })
    }
}
