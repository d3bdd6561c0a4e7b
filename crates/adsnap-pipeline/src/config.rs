//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use adsnap_models::{DEFAULT_AD_DURATION_SECS, MAX_AD_DURATION_SECS};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent directory for per-run workspaces
    pub work_dir: PathBuf,
    /// Directory finished ads are moved into
    pub public_video_dir: PathBuf,
    /// URL path the public video directory is served under
    pub video_url_prefix: String,
    /// Upper clamp for the requested duration
    pub max_ad_duration: f64,
    /// Duration used when none (or garbage) is requested
    pub default_ad_duration: f64,
    /// Timeout for the storyboard generation call
    pub storyboard_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("adsnap"),
            public_video_dir: PathBuf::from("public/videos"),
            video_url_prefix: "/videos".to_string(),
            max_ad_duration: MAX_AD_DURATION_SECS,
            default_ad_duration: DEFAULT_AD_DURATION_SECS,
            storyboard_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            public_video_dir: std::env::var("PUBLIC_VIDEO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_video_dir),
            video_url_prefix: std::env::var("VIDEO_URL_PREFIX")
                .unwrap_or(defaults.video_url_prefix),
            max_ad_duration: std::env::var("MAX_AD_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_ad_duration),
            default_ad_duration: std::env::var("DEFAULT_AD_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_ad_duration),
            storyboard_timeout: Duration::from_secs(
                std::env::var("STORYBOARD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Public URL of a published file.
    pub fn video_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.video_url_prefix.trim_end_matches('/'), file_name)
    }
}
