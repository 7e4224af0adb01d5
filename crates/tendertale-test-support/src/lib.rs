//! Shared test mocks and utilities for the Tendertale visual novel.

mod backend;
mod clock;
mod presentation;
mod repository;
mod surface;

pub use backend::{FailingSceneBackend, InMemorySceneBackend};
pub use clock::{FixedClock, InstantDelay};
pub use presentation::{RecordingAudio, RecordingMessages};
pub use repository::{FailingSaveRepository, InMemorySaveRepository, InMemorySceneRepository};
pub use surface::{
    RecordingSurface, StagedCharacter, SurfaceCall, SurfaceState, with_auto_clicks,
    with_clicks_when_blocked,
};
