//! Service client error types.

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    MissingApiKey(&'static str),

    #[error("{service} returned {status}: {body}")]
    RequestFailed {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Build a `RequestFailed` from a non-success response, consuming its body.
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) => decode_error_body(&bytes),
            Err(e) => format!("<unreadable body: {}>", e),
        };
        Self::RequestFailed {
            service,
            status,
            body,
        }
    }
}

/// Best-effort rendering of an error body: compact JSON when it parses,
/// lossy UTF-8 otherwise.
pub fn decode_error_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).trim().to_string(),
    }
}
