//! Tendertale terminal player.
//!
//! Plays a story served by the Tendertale API in a terminal: an HTTP
//! implementation of the scene backend, a text render surface, and the
//! parsing of player input.

pub mod command;
pub mod config;
pub mod http_backend;
pub mod terminal;
