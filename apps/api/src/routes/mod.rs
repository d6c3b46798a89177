pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::prediction::handlers as prediction;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/parse", post(profile::handle_parse))
        .route("/api/v1/predict", post(prediction::handle_predict))
        .route("/api/v1/predict-text", post(prediction::handle_predict_text))
        .with_state(state)
}
