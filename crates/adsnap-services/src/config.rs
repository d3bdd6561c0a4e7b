//! Service client configuration.

/// Default Gemini model for storyboard generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
/// Default ElevenLabs voice.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
/// Default ElevenLabs model.
pub const DEFAULT_TTS_MODEL: &str = "eleven_monolingual_v1";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PEXELS_BASE_URL: &str = "https://api.pexels.com";
const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Credentials and endpoints for the external services.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    pub pexels_api_key: Option<String>,
    pub pexels_base_url: String,

    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_model_id: String,
    /// Voice stability (0.0-1.0)
    pub voice_stability: f32,
    /// Voice similarity boost (0.0-1.0)
    pub voice_similarity_boost: f32,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            pexels_api_key: None,
            pexels_base_url: PEXELS_BASE_URL.to_string(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: ELEVENLABS_BASE_URL.to_string(),
            elevenlabs_voice_id: DEFAULT_VOICE_ID.to_string(),
            elevenlabs_model_id: DEFAULT_TTS_MODEL.to_string(),
            voice_stability: 0.5,
            voice_similarity_boost: 0.75,
        }
    }
}

impl ServicesConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            pexels_api_key: non_empty_var("PEXELS_API_KEY"),
            pexels_base_url: non_empty_var("PEXELS_BASE_URL").unwrap_or(defaults.pexels_base_url),
            elevenlabs_api_key: non_empty_var("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: non_empty_var("ELEVENLABS_BASE_URL")
                .unwrap_or(defaults.elevenlabs_base_url),
            elevenlabs_voice_id: non_empty_var("ELEVENLABS_VOICE_ID")
                .unwrap_or(defaults.elevenlabs_voice_id),
            elevenlabs_model_id: non_empty_var("ELEVENLABS_MODEL_ID")
                .unwrap_or(defaults.elevenlabs_model_id),
            voice_stability: std::env::var("ELEVENLABS_STABILITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.voice_stability),
            voice_similarity_boost: std::env::var("ELEVENLABS_SIMILARITY_BOOST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.voice_similarity_boost),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
