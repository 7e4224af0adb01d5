//! Tendertale core: shared scene model and collaborator ports.
//!
//! This crate defines the scene document types every other crate consumes
//! and the traits through which the playback engine reaches the outside
//! world (backend, display surface, toasts, audio, time). It contains no
//! infrastructure code.

pub mod backend;
pub mod clock;
pub mod error;
pub mod presentation;
pub mod repository;
pub mod save;
pub mod scene;
pub mod surface;
