//! Per-scene asset resolution.
//!
//! Missing footage or narration never fails a run here: the scene is
//! dropped later (no footage) or rendered over silence (no narration).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

use adsnap_models::{SceneAssets, SceneScript};
use adsnap_services::{FootageSearch, SpeechSynthesizer};

use crate::metrics;

/// File name for a scene's narration, keyed by zero-based storyboard index.
pub fn narration_file_name(scene_index: usize) -> String {
    format!("scene_{}_audio.mp3", scene_index + 1)
}

/// Resolves stock footage and narration for storyboard scenes.
#[derive(Clone)]
pub struct AssetResolver {
    footage: Arc<dyn FootageSearch>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl AssetResolver {
    pub fn new(footage: Arc<dyn FootageSearch>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { footage, speech }
    }

    /// Footage link for a visual description, or `None`.
    async fn resolve_video(&self, visual_description: &str) -> Option<String> {
        let query = visual_description.trim();
        match self.footage.search_video(query).await {
            Ok(Some(link)) => Some(link),
            Ok(None) => {
                warn!(query, "No stock video found");
                metrics::record_asset_unavailable("video");
                None
            }
            Err(e) => {
                warn!(query, error = %e, "Stock video search failed");
                metrics::record_asset_unavailable("video");
                None
            }
        }
    }

    /// Synthesize narration into `dir`, or `None`.
    async fn resolve_narration(
        &self,
        voiceover_script: &str,
        scene_index: usize,
        dir: &Path,
    ) -> Option<PathBuf> {
        let text = voiceover_script.trim();
        let audio = match self.speech.synthesize(text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(scene_index, error = %e, "Narration synthesis failed");
                metrics::record_asset_unavailable("narration");
                return None;
            }
        };

        let path = dir.join(narration_file_name(scene_index));
        if let Err(e) = fs::write(&path, &audio).await {
            warn!(path = %path.display(), error = %e, "Failed to write narration");
            metrics::record_asset_unavailable("narration");
            return None;
        }

        debug!(bytes = audio.len(), "Narration saved to {}", path.display());
        Some(path)
    }

    /// Resolve every scene, strictly one after another in storyboard order.
    ///
    /// Footage then narration for scene `i` completes before scene `i + 1`
    /// starts. The result has one entry per scene, in the same order.
    pub async fn resolve_all(&self, scenes: &[SceneScript], dir: &Path) -> Vec<SceneAssets> {
        let mut resolved = Vec::with_capacity(scenes.len());

        for (index, scene) in scenes.iter().enumerate() {
            debug!(scene = scene.scene_number, "Fetching scene assets");
            let video_source_url = if scene.has_visual() {
                self.resolve_video(&scene.visual_description).await
            } else {
                warn!(scene = scene.scene_number, "Scene has no visual description");
                None
            };
            let narration_audio_path = if scene.has_voiceover() {
                self.resolve_narration(&scene.voiceover_script, index, dir)
                    .await
            } else {
                None
            };

            resolved.push(SceneAssets {
                video_source_url,
                narration_audio_path,
            });
        }

        let with_video = resolved.iter().filter(|a| a.is_renderable()).count();
        info!(
            scenes = scenes.len(),
            with_video, "All scene assets fetched"
        );
        resolved
    }
}
