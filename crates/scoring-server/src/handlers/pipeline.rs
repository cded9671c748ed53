//! Pipeline service handlers.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use scoring_core::LeadRecord;
use scoring_engine::{prepare_input, score};
use tracing::info;

use crate::dto::{HealthResponse, LeadScoreResponse};
use crate::error::AppError;
use crate::state::PipelineState;

/// Reports whether the pipeline was loaded.
pub async fn health(State(state): State<Arc<PipelineState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        model_loaded: state.is_loaded(),
        load_error: state.load_error.clone(),
    })
}

/// Scores a single lead record.
pub async fn predict(
    State(state): State<Arc<PipelineState>>,
    payload: Result<Json<LeadRecord>, JsonRejection>,
) -> Result<Json<LeadScoreResponse>, AppError> {
    let Json(record) = payload?;

    let Some(pipeline) = state.pipeline.as_ref() else {
        let reason = state.load_error.as_deref().unwrap_or("unknown error");
        return Err(AppError::Internal(format!("Model not loaded: {}", reason)));
    };

    let input = prepare_input(record.to_value());
    let score = score(pipeline, input)
        .and_then(|scores| scores.first())
        .map_err(|e| AppError::Internal(format!("Scoring error: {}", e)))?;

    info!("Scored lead ({}): {}", record.lead_source, score);
    Ok(Json(LeadScoreResponse { record, score }))
}
