//! Tendertale scene playback engine.
//!
//! Responsible for playing one scene at a time on a render surface: fading
//! between scenes, typing dialogue, applying stage commands, gating on player
//! clicks and presenting choices. The application layer wraps the engine in
//! a game controller that talks to the story backend.

pub mod application;
pub mod config;
pub mod domain;
