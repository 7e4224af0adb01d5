//! Tendertale Store: filesystem-backed repositories.
//!
//! Scenes are read from `<scenes_dir>/<scene_id>.json`; saves live in
//! `<saves_dir>/<user_id>.json`. Ids become file names, so any id that could
//! escape its directory is rejected before the filesystem is touched.

pub mod document;
pub mod fs_save_repository;
pub mod fs_scene_repository;

pub use fs_save_repository::FsSaveRepository;
pub use fs_scene_repository::FsSceneRepository;
