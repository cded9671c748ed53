//! Data transfer objects for HTTP message serialization.

use scoring_core::LeadRecord;
use serde::{Deserialize, Serialize};

/// Pipeline service health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model_loaded: bool,
    pub load_error: Option<String>,
}

/// Score for a single lead, echoed with the validated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadScoreResponse {
    pub record: LeadRecord,
    pub score: serde_json::Value,
}

/// Positive-class probability and the thresholded decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientScoreResponse {
    pub client: bool,
    pub y_pred: f64,
}
