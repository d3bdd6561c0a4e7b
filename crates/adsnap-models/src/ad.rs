//! Inbound ad generation request/response schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shortest allowed ad, in seconds.
pub const MIN_AD_DURATION_SECS: f64 = 1.0;
/// Longest allowed ad, in seconds.
pub const MAX_AD_DURATION_SECS: f64 = 60.0;
/// Duration used when the request names none (or an unusable one).
pub const DEFAULT_AD_DURATION_SECS: f64 = 15.0;

/// Maximum prompt length accepted from clients.
const MAX_PROMPT_CHARS: usize = 4000;

/// Request body for ad generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateAdRequest {
    /// Free-text description of the ad
    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub options: AdOptions,
}

impl GenerateAdRequest {
    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("Request body must contain a 'prompt' field.".to_string());
        }

        if self.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(format!(
                "Prompt is too long (max {} characters)",
                MAX_PROMPT_CHARS
            ));
        }

        Ok(())
    }
}

/// Optional generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AdOptions {
    /// Requested total duration. Kept untyped so that strings and garbage
    /// fall back to the default instead of rejecting the request.
    #[serde(
        default,
        rename = "durationSeconds",
        alias = "duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<Value>,
}

impl AdOptions {
    /// Options with a numeric duration.
    pub fn with_duration(secs: f64) -> Self {
        Self {
            duration_seconds: Some(Value::from(secs)),
        }
    }

    /// The requested duration when it is numeric (or a numeric string).
    pub fn requested_duration(&self) -> Option<f64> {
        match self.duration_seconds.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|d| d.is_finite())
    }
}

/// Clamp a requested duration into `[MIN_AD_DURATION_SECS, max_secs]`,
/// substituting `default_secs` when absent.
pub fn clamp_duration(requested: Option<f64>, default_secs: f64, max_secs: f64) -> f64 {
    let max_secs = max_secs.max(MIN_AD_DURATION_SECS);
    requested
        .unwrap_or(default_secs)
        .clamp(MIN_AD_DURATION_SECS, max_secs)
}

/// Successful ad generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAdResponse {
    pub title: String,
    /// Path under the static video root, e.g. `/videos/ad_run_1.mp4`
    pub video_url: String,
}
