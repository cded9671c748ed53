//! Shared server state for the two services.

use std::path::Path;

use scoring_config::ClientServiceConfig;
use scoring_model::{load_artifact, Artifact, ModelError};
use tracing::{error, info};

/// State of the pipeline service.
///
/// A failed load does not stop the service; the error is kept and reported
/// by `/health` and `/predict`.
pub struct PipelineState {
    pub pipeline: Option<Artifact>,
    pub load_error: Option<String>,
}

impl PipelineState {
    /// Loads the pipeline artifact, recording any failure.
    pub fn load(path: &Path) -> Self {
        match load_artifact(path) {
            Ok(pipeline) => {
                info!("Loaded {} from {}", pipeline.kind(), path.display());
                Self::loaded(pipeline)
            }
            Err(e) => {
                error!("Failed to load pipeline from {}: {}", path.display(), e);
                Self { pipeline: None, load_error: Some(e.to_string()) }
            }
        }
    }

    pub fn loaded(pipeline: Artifact) -> Self {
        Self { pipeline: Some(pipeline), load_error: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline.is_some()
    }
}

/// State of the model + vectorizer service.
pub struct ClientState {
    pub model: Artifact,
    pub vectorizer: Artifact,
    pub threshold: f64,
}

impl ClientState {
    /// Loads both artifacts; either failure is fatal.
    pub fn load(config: &ClientServiceConfig) -> Result<Self, ModelError> {
        let model = load_artifact(&config.model_path)?;
        info!("Loaded {} from {}", model.kind(), config.model_path.display());

        let vectorizer = load_artifact(&config.dv_path)?;
        info!("Loaded {} from {}", vectorizer.kind(), config.dv_path.display());

        Ok(Self { model, vectorizer, threshold: config.threshold })
    }
}
