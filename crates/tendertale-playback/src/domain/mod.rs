//! Playback building blocks, each usable on its own.

pub mod cast;
pub mod commands;
pub mod gate;
pub mod history;
pub mod overlay;
pub mod transition;
pub mod typing;
