use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ApiKey;
use crate::prediction::model::Predictor;
use crate::profile::extractor::Extractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    /// `None` when no `PREDICTION_MODEL_PATH` is configured; prediction endpoints answer 503.
    pub predictor: Option<Arc<dyn Predictor>>,
    pub config: Config,
}

impl AppState {
    /// Picks the credential for one extraction: the caller's key, else the configured fallback.
    pub fn api_key(&self, supplied: Option<&str>) -> Option<ApiKey> {
        supplied
            .and_then(|key| ApiKey::new(key))
            .or_else(|| self.config.openai_api_key.clone())
    }
}
