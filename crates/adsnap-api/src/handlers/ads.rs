//! Ad generation handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use adsnap_models::{GenerateAdRequest, GenerateAdResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /api/response` (and `/api/generate`).
///
/// The pipeline runs in its own task so a client hanging up does not
/// abandon a half-finished run.
pub async fn generate_ad(
    State(state): State<AppState>,
    body: Result<Json<GenerateAdRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateAdResponse>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    info!(
        prompt_len = request.prompt.len(),
        duration = ?request.options.requested_duration(),
        "Ad generation requested"
    );

    let pipeline = state.pipeline.clone();
    let production = state.config.is_production();
    let response = tokio::spawn(async move { pipeline.generate(&request).await })
        .await
        .map_err(|e| {
            ApiError::internal(format!("generation task failed: {}", e)).redact(production)
        })??;

    Ok(Json(response))
}
