mod config;
mod errors;
mod llm_client;
mod prediction;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::prediction::model::{LinearModel, Predictor};
use crate::profile::extractor::Extractor;
use crate::profile::observer::TracingObserver;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stride API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        &config.openai_base_url,
        &config.openai_model,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; extraction requires a per-request key");
    }

    let mut extractor = Extractor::new(Arc::new(llm));
    if config.extraction_trace {
        extractor = extractor.with_observer(Arc::new(TracingObserver));
        info!("Extraction tracing enabled");
    }

    // Initialize predictor (optional — prediction endpoints answer 503 without it)
    let predictor: Option<Arc<dyn Predictor>> = match &config.prediction_model_path {
        Some(path) => {
            let model = LinearModel::from_path(path)?;
            info!("Prediction model loaded from {}", path.display());
            Some(Arc::new(model))
        }
        None => {
            warn!("PREDICTION_MODEL_PATH not set; prediction endpoints disabled");
            None
        }
    };

    let state = AppState {
        extractor: Arc::new(extractor),
        predictor,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
