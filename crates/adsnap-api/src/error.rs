//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use adsnap_pipeline::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Hide internal details from clients in production. Pipeline messages
    /// are written for end users and pass through unchanged.
    pub fn redact(self, production: bool) -> Self {
        match self {
            ApiError::Internal(_) if production => {
                ApiError::Internal("an internal error occurred".to_string())
            }
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(PipelineError::invalid_request("no prompt")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PipelineError::NoRenderableScenes).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(PipelineError::UpstreamTimeout(30)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_pipeline_message_passes_through() {
        let err = ApiError::from(PipelineError::invalid_request(
            "Request body must contain a 'prompt' field.",
        ));
        assert_eq!(err.to_string(), "Request body must contain a 'prompt' field.");
    }

    #[test]
    fn test_redact_hides_internal_details_in_production() {
        let err = ApiError::internal("generation task failed: panicked at pipeline.rs");
        assert_eq!(
            err.redact(true).to_string(),
            "Internal error: an internal error occurred"
        );

        let err = ApiError::internal("generation task failed: panicked at pipeline.rs");
        assert!(err.redact(false).to_string().contains("panicked at pipeline.rs"));

        let err = ApiError::from(PipelineError::NoRenderableScenes).redact(true);
        assert_eq!(err.to_string(), PipelineError::NoRenderableScenes.to_string());
    }
}
