//! Pipeline service entry point.
//!
//! Loads a single pipeline artifact and serves `/health` and `/predict`.
//! The service starts even when the artifact fails to load.

use std::sync::Arc;

use anyhow::Result;
use scoring_config::PipelineServiceConfig;
use scoring_server::{init_tracing, pipeline_router, serve, PipelineState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = PipelineServiceConfig::from_env()?;

    let state = Arc::new(PipelineState::load(&config.pipeline_path));
    if !state.is_loaded() {
        warn!("Serving without a model; /predict will fail until restart");
    }

    let app = pipeline_router(state);
    info!("Starting pipeline service on {}", config.addr());
    serve(&config.addr(), app).await
}
