//! Application state.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use adsnap_media::{FfmpegConcatenator, FfmpegRunner, FfmpegSceneRenderer};
use adsnap_models::EncodingConfig;
use adsnap_pipeline::{AdPipeline, Collaborators, PipelineConfig};
use adsnap_services::{ElevenLabsClient, GeminiClient, PexelsClient, ServicesConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<AdPipeline>,
}

impl AppState {
    pub fn new(config: ApiConfig, pipeline: AdPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Build the pipeline and its clients from the environment.
    ///
    /// One HTTP client is shared by every outbound integration.
    pub fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let services = ServicesConfig::from_env();
        for (key, value) in [
            ("GEMINI_API_KEY", &services.gemini_api_key),
            ("PEXELS_API_KEY", &services.pexels_api_key),
            ("ELEVENLABS_API_KEY", &services.elevenlabs_api_key),
        ] {
            if value.is_none() {
                warn!("{} is not set; requests needing it will fail", key);
            }
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let mut pipeline_config = PipelineConfig::from_env();
        if std::env::var("PUBLIC_VIDEO_DIR").is_err() {
            pipeline_config.public_video_dir = config.public_dir.join("videos");
        }

        let mut runner = FfmpegRunner::new();
        if let Some(secs) = config.ffmpeg_timeout_secs {
            runner = runner.with_timeout(secs);
        }
        let collaborators = Collaborators {
            generator: Arc::new(GeminiClient::new(http.clone(), &services)),
            footage: Arc::new(PexelsClient::new(http.clone(), &services)),
            speech: Arc::new(ElevenLabsClient::new(http.clone(), &services)),
            renderer: Arc::new(FfmpegSceneRenderer::new(
                http,
                runner.clone(),
                EncodingConfig::default(),
            )),
            concatenator: Arc::new(FfmpegConcatenator::new(runner)),
        };

        Ok(Self::new(config, AdPipeline::new(pipeline_config, collaborators)))
    }
}
