//! Per-scene asset and render models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Assets resolved for one scene.
///
/// Owned by a single pipeline run and never shared across scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAssets {
    /// Stock footage download link
    pub video_source_url: Option<String>,
    /// Synthesized narration inside the run workspace
    pub narration_audio_path: Option<PathBuf>,
}

impl SceneAssets {
    /// A scene is renderable only when footage was found.
    pub fn is_renderable(&self) -> bool {
        self.video_source_url.is_some()
    }
}

/// A normalized clip produced for one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedScene {
    pub scene_number: u32,
    pub clip_path: PathBuf,
    pub duration_seconds: f64,
}
