//! Client service handler: vectorize, then take the positive-class probability.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use scoring_model::{ModelInput, Predictor};
use serde_json::Value;
use tracing::info;

use crate::dto::ClientScoreResponse;
use crate::error::AppError;
use crate::state::ClientState;

fn scoring_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Scoring error: {}", e))
}

/// Scores one customer record.
pub async fn predict(
    State(state): State<Arc<ClientState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClientScoreResponse>, AppError> {
    let Json(customer) = payload?;
    if !customer.is_object() {
        return Err(AppError::Validation("request body must be a JSON object".into()));
    }

    let x = state
        .vectorizer
        .transform(&ModelInput::Records(vec![customer]))
        .ok_or_else(|| scoring_error(format!("{} artifact cannot transform records", state.vectorizer.kind())))?
        .map_err(scoring_error)?;

    let proba = state
        .model
        .predict_proba(&ModelInput::Matrix(x))
        .ok_or_else(|| scoring_error(format!("{} artifact has no predict_proba", state.model.kind())))?
        .map_err(scoring_error)?;

    let y_pred = proba
        .get((0, 1))
        .copied()
        .ok_or_else(|| scoring_error("model returned no positive-class probability"))?;
    let client = y_pred >= state.threshold;

    info!("Scored customer: y_pred={:.4} client={}", y_pred, client);
    Ok(Json(ClientScoreResponse { client, y_pred }))
}
