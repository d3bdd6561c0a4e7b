//! Storyboard models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Title used when the generated text carries no heading line.
pub const FALLBACK_TITLE: &str = "Untitled Video Ad";

/// Whether overlay text should be burned in: non-empty and not "none" in
/// any case.
pub fn is_overlay_text(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !text.eq_ignore_ascii_case("none")
}

/// One scene of the storyboard, in screen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneScript {
    /// 1-indexed scene number
    pub scene_number: u32,

    /// Query text for stock footage
    pub visual_description: String,

    /// Narration text (may be empty)
    #[serde(default)]
    pub voiceover_script: String,

    /// Overlay text; empty or "none" means no overlay
    #[serde(default)]
    pub on_screen_text: String,
}

impl SceneScript {
    /// Create a scene with empty text fields.
    pub fn new(scene_number: u32) -> Self {
        Self {
            scene_number,
            visual_description: String::new(),
            voiceover_script: String::new(),
            on_screen_text: String::new(),
        }
    }

    /// Whether the overlay text should be burned in.
    pub fn has_overlay(&self) -> bool {
        is_overlay_text(&self.on_screen_text)
    }

    /// Whether there is narration text to synthesize.
    pub fn has_voiceover(&self) -> bool {
        !self.voiceover_script.trim().is_empty()
    }

    /// Whether there is a footage query.
    pub fn has_visual(&self) -> bool {
        !self.visual_description.trim().is_empty()
    }
}

/// Structured storyboard: a title plus ordered scenes.
///
/// `scenes` is never reordered; insertion order is screen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardDocument {
    pub title: String,
    pub scenes: Vec<SceneScript>,
}

impl StoryboardDocument {
    /// Number of parsed scenes.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Uniform per-scene duration for a total ad duration.
    ///
    /// Returns the total unchanged for an empty document, which a successful
    /// parse never produces.
    pub fn per_scene_duration(&self, total_secs: f64) -> f64 {
        if self.scenes.is_empty() {
            return total_secs;
        }
        total_secs / self.scenes.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(text: &str) -> SceneScript {
        SceneScript {
            on_screen_text: text.to_string(),
            ..SceneScript::new(1)
        }
    }

    #[test]
    fn test_overlay_detection() {
        assert!(!scene("").has_overlay());
        assert!(!scene("none").has_overlay());
        assert!(!scene("NONE").has_overlay());
        assert!(!scene("None").has_overlay());
        assert!(!scene("   ").has_overlay());
        assert!(scene("Buy now").has_overlay());
        assert!(scene("None of the above").has_overlay());
    }

    #[test]
    fn test_per_scene_duration() {
        let doc = StoryboardDocument {
            title: "Ad".to_string(),
            scenes: vec![SceneScript::new(1), SceneScript::new(2), SceneScript::new(3)],
        };
        assert_eq!(doc.scene_count(), 3);
        assert!((doc.per_scene_duration(15.0) - 5.0).abs() < f64::EPSILON);
    }
}
