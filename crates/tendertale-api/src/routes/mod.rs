//! Route modules.

pub mod health;
pub mod save;
pub mod scene;
