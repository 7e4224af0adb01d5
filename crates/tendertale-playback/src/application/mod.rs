//! Scene playback engine and the game controller driving it.

pub mod engine;
pub mod game;
