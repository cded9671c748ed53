//! Core domain types and error definitions for scoring.
//!
//! This crate provides the fundamental types shared across the workspace:
//!
//! - [`ModelError`] - Error type for artifact loading, reshaping and prediction
//! - [`LeadRecord`] - The typed record accepted by the pipeline service
//!
//! # Example
//!
//! ```rust
//! use scoring_core::LeadRecord;
//!
//! let record: LeadRecord = serde_json::from_str(
//!     r#"{"lead_source": "paid_ads", "number_of_courses_viewed": 2, "annual_income": 79276.0}"#,
//! ).unwrap();
//!
//! assert_eq!(record.lead_source, "paid_ads");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading an artifact or scoring a record.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact file could not be read.
    #[error("{}", io_message(.path, .source))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not a valid artifact document.
    #[error("failed to parse artifact '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Input has a shape the step cannot consume.
    #[error("{0}")]
    Shape(String),

    /// A feature value could not be encoded.
    #[error("{0}")]
    Feature(String),

    /// Feature matrix width does not match the estimator.
    #[error("X has {found} features, but the estimator is expecting {expected} features as input")]
    Dimension { expected: usize, found: usize },

    /// Loaded object exposes no prediction method.
    #[error("Loaded object has neither predict_proba nor predict")]
    NoPredictMethod,

    /// Prediction produced no rows.
    #[error("model returned no scores")]
    EmptyOutput,
}

fn io_message(path: &str, source: &std::io::Error) -> String {
    match source.kind() {
        std::io::ErrorKind::NotFound => format!("file not found: {}", path),
        _ => format!("failed to read '{}': {}", path, source),
    }
}

impl ModelError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates a parse error with path context.
    pub fn parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }

    /// Creates a shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Creates a feature encoding error.
    pub fn feature(message: impl Into<String>) -> Self {
        Self::Feature(message.into())
    }
}

/// A single lead to score with the pipeline service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Acquisition channel (e.g. "paid_ads", "organic_search").
    pub lead_source: String,
    /// Number of courses the lead has viewed.
    pub number_of_courses_viewed: i64,
    /// Declared annual income.
    pub annual_income: f64,
}

impl LeadRecord {
    /// Converts the record to a JSON object for the vectorizer.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "lead_source": self.lead_source,
            "number_of_courses_viewed": self.number_of_courses_viewed,
            "annual_income": self.annual_income,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_message_names_path() {
        let err = ModelError::io(
            "pipeline_v1.bin",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "file not found: pipeline_v1.bin");
    }

    #[test]
    fn lead_record_rejects_missing_field() {
        let parsed = serde_json::from_str::<LeadRecord>(r#"{"lead_source": "events"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn lead_record_value_keeps_field_order() {
        let record = LeadRecord {
            lead_source: "events".into(),
            number_of_courses_viewed: 3,
            annual_income: 50_000.0,
        };
        let value = record.to_value();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["lead_source", "number_of_courses_viewed", "annual_income"]);
    }
}
