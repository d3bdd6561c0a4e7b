//! Shared data models for the AdSnap backend.
//!
//! This crate provides Serde-serializable types for:
//! - Storyboards and the scenes parsed out of them
//! - Per-scene assets and rendered clips
//! - Pipeline run identity and lifecycle state
//! - The inbound ad request/response schema
//! - Encoding configuration for scene clips

pub mod ad;
pub mod encoding;
pub mod run;
pub mod scene;
pub mod storyboard;

// Re-export common types
pub use ad::{
    clamp_duration, AdOptions, GenerateAdRequest, GenerateAdResponse, DEFAULT_AD_DURATION_SECS,
    MAX_AD_DURATION_SECS, MIN_AD_DURATION_SECS,
};
pub use encoding::{EncodingConfig, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use run::{RunId, RunState, RunStateError};
pub use scene::{RenderedScene, SceneAssets};
pub use storyboard::{is_overlay_text, SceneScript, StoryboardDocument, FALLBACK_TITLE};
