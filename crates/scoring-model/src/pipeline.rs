//! Transformer steps chained in front of a final estimator.

use ndarray::Array2;
use scoring_core::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::ModelInput;
use crate::linear::Estimator;
use crate::transform::Transformer;

/// Fitted preprocessing steps followed by an estimator.
///
/// Capabilities follow the estimator: a pipeline only has `predict_proba`
/// when its final step does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub steps: Vec<Transformer>,
    pub estimator: Estimator,
}

impl Pipeline {
    /// Runs every step in order; each step after the first sees a matrix.
    pub fn transform(&self, input: &ModelInput) -> Result<ModelInput, ModelError> {
        let mut current: Option<Array2<f64>> = None;
        for step in &self.steps {
            let x = match current.take() {
                Some(m) => step.transform(&ModelInput::Matrix(m))?,
                None => step.transform(input)?,
            };
            current = Some(x);
        }
        Ok(match current {
            Some(m) => ModelInput::Matrix(m),
            None => input.clone(),
        })
    }

    pub fn predict_proba(&self, input: &ModelInput) -> Option<Result<Array2<f64>, ModelError>> {
        if !self.estimator.has_predict_proba() {
            return None;
        }
        let x = match self.transform(input) {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        self.estimator.predict_proba(&x)
    }

    pub fn predict(&self, input: &ModelInput) -> Option<Result<Vec<Value>, ModelError>> {
        let x = match self.transform(input) {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        self.estimator.predict(&x)
    }
}
