//! Pexels stock video search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ServicesConfig;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "Pexels";
const PREFERRED_WIDTH: u32 = 1920;

/// Looks up a downloadable stock video for a visual description.
#[async_trait]
pub trait FootageSearch: Send + Sync {
    /// `Ok(None)` when the search matched nothing.
    async fn search_video(&self, query: &str) -> ServiceResult<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

/// One encoding of a Pexels video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoFile {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    pub link: String,
}

impl VideoFile {
    fn is_hd(&self) -> bool {
        self.quality.as_deref() == Some("hd")
    }
}

/// Prefer HD at 1920 wide, then any HD, then the first file.
pub fn pick_video_file(files: &[VideoFile]) -> Option<&VideoFile> {
    files
        .iter()
        .find(|f| f.is_hd() && f.width == Some(PREFERRED_WIDTH))
        .or_else(|| files.iter().find(|f| f.is_hd()))
        .or_else(|| files.first())
}

/// Pexels API client.
pub struct PexelsClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl PexelsClient {
    pub fn new(http: Client, config: &ServicesConfig) -> Self {
        Self {
            http,
            api_key: config.pexels_api_key.clone(),
            base_url: config.pexels_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FootageSearch for PexelsClient {
    async fn search_video(&self, query: &str) -> ServiceResult<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey("PEXELS_API_KEY"))?;

        let response = self
            .http
            .get(format!("{}/videos/search", self.base_url))
            .header("Authorization", api_key)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let results: SearchResponse = response.json().await?;
        let link = results
            .videos
            .first()
            .and_then(|v| pick_video_file(&v.video_files))
            .map(|f| f.link.clone());

        debug!(query, found = link.is_some(), "Pexels search finished");
        Ok(link)
    }
}
