//! ElevenLabs text-to-speech client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::ServicesConfig;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "ElevenLabs";

/// Turns narration text into MPEG audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// ElevenLabs API client.
pub struct ElevenLabsClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    voice_id: String,
    model_id: String,
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsClient {
    pub fn new(http: Client, config: &ServicesConfig) -> Self {
        Self {
            http,
            api_key: config.elevenlabs_api_key.clone(),
            base_url: config.elevenlabs_base_url.trim_end_matches('/').to_string(),
            voice_id: config.elevenlabs_voice_id.clone(),
            model_id: config.elevenlabs_model_id.clone(),
            stability: config.voice_stability,
            similarity_boost: config.voice_similarity_boost,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey("ELEVENLABS_API_KEY"))?;

        let body = SpeechRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: self.stability,
                similarity_boost: self.similarity_boost,
            },
        };

        let response = self
            .http
            .post(format!(
                "{}/v1/text-to-speech/{}",
                self.base_url, self.voice_id
            ))
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ServiceError::invalid_response("empty audio from ElevenLabs"));
        }

        debug!(bytes = audio.len(), "Synthesized narration");
        Ok(audio.to_vec())
    }
}
