//! Filesystem implementation of the `SceneRepository` trait.

use std::path::PathBuf;

use async_trait::async_trait;
use tendertale_core::error::StoreError;
use tendertale_core::repository::SceneRepository;
use tendertale_core::scene::Scene;
use tracing::debug;

use crate::document::{document_path, read_json};

/// Serves authored scenes from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FsSceneRepository {
    dir: PathBuf,
}

impl FsSceneRepository {
    /// Creates a repository reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SceneRepository for FsSceneRepository {
    async fn load_scene(&self, scene_id: &str) -> Result<Scene, StoreError> {
        let path = document_path(&self.dir, scene_id)?;
        debug!(path = %path.display(), "reading scene");
        let mut scene: Scene = read_json(&path, &format!("scene '{scene_id}'")).await?;
        if scene.id.is_empty() {
            scene.id = scene_id.to_owned();
        }
        Ok(scene)
    }
}
