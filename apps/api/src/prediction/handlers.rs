//! Axum route handlers for the Prediction API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::prediction::model::{predict_half_marathon, Prediction, Predictor};
use crate::prediction::validation::{PredictRequest, PredictionInput};
use crate::profile::handlers::ExtractRequest;
use crate::profile::models::RunnerProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub input: PredictionInput,
    pub prediction: Prediction,
}

#[derive(Debug, Serialize)]
pub struct PredictTextResponse {
    pub input_text: String,
    pub extracted: RunnerProfile,
    pub input: PredictionInput,
    pub prediction: Prediction,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/predict
///
/// Predicts a half-marathon time from explicit form fields.
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let input = PredictionInput::from_request(&request)?;
    let prediction = predict_half_marathon(predictor(&state)?, &input)?;

    Ok(Json(PredictResponse { input, prediction }))
}

/// POST /api/v1/predict-text
///
/// Full pipeline: extract profile from text → validate bounds → predict.
/// An incomplete profile is answered with 422 and the fields still missing.
pub async fn handle_predict_text(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<PredictTextResponse>, AppError> {
    let input_text = request.text.trim().to_string();
    if input_text.is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let api_key = state.api_key(request.openai_api_key.as_deref());
    let extracted = state.extractor.extract(&input_text, api_key.as_ref()).await;

    let input = PredictionInput::from_profile(&extracted)?;
    let prediction = predict_half_marathon(predictor(&state)?, &input)?;

    Ok(Json(PredictTextResponse {
        input_text,
        extracted,
        input,
        prediction,
    }))
}

fn predictor(state: &AppState) -> Result<&dyn Predictor, AppError> {
    state.predictor.as_deref().ok_or(AppError::ModelUnavailable)
}
