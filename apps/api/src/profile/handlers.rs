//! Axum route handlers for profile extraction.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::profile::models::RunnerProfile;
use crate::state::AppState;

// No Debug: the body may carry an API key.
#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    /// Used for this call only; never stored or logged.
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub extracted: RunnerProfile,
}

/// POST /api/v1/parse
///
/// Extracts sex, age and 5 km time from free text. Upstream failures come back
/// as an all-missing profile, not as an error.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let api_key = state.api_key(request.openai_api_key.as_deref());
    let extracted = state.extractor.extract(&request.text, api_key.as_ref()).await;

    Ok(Json(ExtractResponse { extracted }))
}
