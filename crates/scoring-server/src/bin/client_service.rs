//! Client service entry point.
//!
//! Loads a model and a feature vectorizer from two files and serves
//! `/predict`, answering with the positive-class probability.

use std::sync::Arc;

use anyhow::{Context, Result};
use scoring_config::ClientServiceConfig;
use scoring_server::{client_router, init_tracing, serve, ClientState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = ClientServiceConfig::from_env()?;

    let state = ClientState::load(&config).context("failed to load model artifacts")?;
    info!("Decision threshold: {}", state.threshold);

    let app = client_router(Arc::new(state));
    info!("Starting client service on {}", config.addr());
    serve(&config.addr(), app).await
}
