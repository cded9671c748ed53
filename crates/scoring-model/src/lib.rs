//! Serialized model artifacts and their prediction capabilities.
//!
//! Artifacts are JSON documents tagged with a `kind` field, exported once
//! from the training side and loaded at service startup:
//!
//! | kind | capabilities |
//! |------|--------------|
//! | `dict_vectorizer` | transform |
//! | `column_selector` | transform (frame input) |
//! | `logistic_regression` | `predict_proba`, `predict` |
//! | `linear_regression` | `predict` |
//! | `pipeline` | steps + estimator, capabilities follow the estimator |
//!
//! Pipeline steps are `dict_vectorizer`, `column_selector` or
//! `standard_scaler` (matrix input, so never first).
//!
//! # Example
//!
//! ```rust,ignore
//! use scoring_model::{load_artifact, ModelInput, Predictor};
//!
//! let pipeline = load_artifact("pipeline_v1.bin")?;
//! let input = ModelInput::Records(vec![record]);
//! if let Some(proba) = pipeline.predict_proba(&input) {
//!     println!("{:?}", proba?);
//! }
//! ```

mod input;
mod linear;
mod pipeline;
mod transform;

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub use input::{Frame, ModelInput};
pub use linear::{Estimator, LinearRegression, LogisticRegression};
pub use pipeline::Pipeline;
pub use scoring_core::ModelError;
pub use transform::{ColumnSelector, DictVectorizer, StandardScaler, Transformer};

/// Something that may be able to score inputs.
///
/// Each method returns `None` when the object does not offer that
/// capability at all, and `Some(Err(..))` when it does but the call failed.
pub trait Predictor: Send + Sync {
    /// Class probabilities, one row per record and one column per class.
    fn predict_proba(&self, input: &ModelInput) -> Option<Result<Array2<f64>, ModelError>>;

    /// Point predictions (class labels or regression values).
    fn predict(&self, input: &ModelInput) -> Option<Result<Vec<Value>, ModelError>>;
}

/// Any artifact that can be loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Pipeline(Pipeline),
    DictVectorizer(DictVectorizer),
    ColumnSelector(ColumnSelector),
    LogisticRegression(LogisticRegression),
    LinearRegression(LinearRegression),
}

impl Artifact {
    /// Parses an artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this artifact to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Pipeline(_) => "pipeline",
            Artifact::DictVectorizer(_) => "dict_vectorizer",
            Artifact::ColumnSelector(_) => "column_selector",
            Artifact::LogisticRegression(_) => "logistic_regression",
            Artifact::LinearRegression(_) => "linear_regression",
        }
    }

    /// Applies a transformer artifact; `None` for estimators.
    pub fn transform(&self, input: &ModelInput) -> Option<Result<Array2<f64>, ModelError>> {
        match self {
            Artifact::DictVectorizer(dv) => Some(dv.transform(input)),
            Artifact::ColumnSelector(cs) => Some(cs.transform(input)),
            Artifact::Pipeline(p) => Some(p.transform(input).and_then(|x| match x {
                ModelInput::Matrix(m) => Ok(m),
                other => Err(ModelError::shape(format!(
                    "pipeline has no transform steps to turn {} into a matrix",
                    other.kind()
                ))),
            })),
            Artifact::LogisticRegression(_) | Artifact::LinearRegression(_) => None,
        }
    }
}

impl Predictor for Artifact {
    fn predict_proba(&self, input: &ModelInput) -> Option<Result<Array2<f64>, ModelError>> {
        match self {
            Artifact::Pipeline(p) => p.predict_proba(input),
            Artifact::LogisticRegression(m) => Some(m.predict_proba(input)),
            _ => None,
        }
    }

    fn predict(&self, input: &ModelInput) -> Option<Result<Vec<Value>, ModelError>> {
        match self {
            Artifact::Pipeline(p) => p.predict(input),
            Artifact::LogisticRegression(m) => Some(m.predict(input)),
            Artifact::LinearRegression(m) => Some(m.predict(input)),
            _ => None,
        }
    }
}

/// Loads an artifact from a file.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<Artifact, ModelError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ModelError::io(&shown, e))?;
    let artifact = Artifact::from_json(&content).map_err(|e| ModelError::parse(&shown, e))?;
    debug!(path = %shown, kind = artifact.kind(), "loaded artifact");
    Ok(artifact)
}
