//! Input preparation and prediction dispatch for scoring.
//!
//! - [`prepare_input`] - Wraps a JSON record into the list-of-mappings shape
//! - [`score`] - Calls the best prediction method the artifact offers
//! - [`Scores`] - Output of a scoring call
//!
//! # Dispatch
//!
//! 1. `predict_proba` if available. A two-column result is reduced to the
//!    positive-class column; wider results are returned row by row.
//! 2. Otherwise `predict`.
//! 3. Otherwise [`ModelError::NoPredictMethod`].
//!
//! When the call fails, the input is reshaped once (frame to records, or
//! records to frame) and retried. If the retry fails too, the first error
//! is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use scoring_engine::{prepare_input, score};
//!
//! let input = prepare_input(serde_json::json!({"job": "management", "duration": 400}));
//! let scores = score(&pipeline, input)?;
//! println!("{}", scores.first()?);
//! ```

use ndarray::{Array2, Axis};
use scoring_model::{Frame, ModelInput, Predictor};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub use scoring_core::ModelError;

/// Result of scoring one or more records.
///
/// Serializes as a plain JSON list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scores {
    /// Probability of the positive class for each record (binary models).
    Positive(Vec<f64>),
    /// Full probability rows for each record.
    Rows(Vec<Vec<f64>>),
    /// Labels or regression values from `predict`.
    Labels(Vec<Value>),
}

impl Scores {
    /// Score of the first record as a JSON value.
    pub fn first(&self) -> Result<Value, ModelError> {
        let value = match self {
            Scores::Positive(v) => v.first().map(|p| Value::from(*p)),
            Scores::Rows(v) => v.first().map(|row| Value::from(row.clone())),
            Scores::Labels(v) => v.first().cloned(),
        };
        value.ok_or(ModelError::EmptyOutput)
    }

    fn from_proba(proba: Array2<f64>) -> Self {
        if proba.ncols() == 2 {
            return Scores::Positive(proba.column(1).to_vec());
        }
        Scores::Rows(proba.axis_iter(Axis(0)).map(|row| row.to_vec()).collect())
    }
}

/// Wraps a record into the list-of-mappings shape most artifacts expect.
///
/// An object becomes a one-element list, an array is taken as the list
/// itself, and any other value is wrapped as-is.
pub fn prepare_input(record: Value) -> ModelInput {
    match record {
        Value::Array(items) => ModelInput::Records(items),
        other => ModelInput::Records(vec![other]),
    }
}

fn call(predictor: &dyn Predictor, input: &ModelInput) -> Result<Scores, ModelError> {
    if let Some(proba) = predictor.predict_proba(input) {
        return proba.map(Scores::from_proba);
    }
    if let Some(labels) = predictor.predict(input) {
        return labels.map(Scores::Labels);
    }
    Err(ModelError::NoPredictMethod)
}

/// Alternative shape to retry with after a failed call.
fn reshape(input: &ModelInput) -> Option<ModelInput> {
    match input {
        ModelInput::Frame(frame) => Some(ModelInput::Records(frame.to_records())),
        ModelInput::Records(records) => match Frame::from_records(records) {
            Ok(frame) => Some(ModelInput::Frame(frame)),
            Err(e) => {
                debug!("records cannot be reshaped into a frame: {}", e);
                None
            }
        },
        ModelInput::Matrix(_) => None,
    }
}

/// Scores `input` with the best method `predictor` offers.
pub fn score(predictor: &dyn Predictor, input: ModelInput) -> Result<Scores, ModelError> {
    let err = match call(predictor, &input) {
        Ok(scores) => return Ok(scores),
        Err(e) => e,
    };

    let Some(retry) = reshape(&input) else {
        return Err(err);
    };

    warn!(
        "scoring {} failed ({}), retrying as {}",
        input.kind(),
        err,
        retry.kind()
    );
    call(predictor, &retry).map_err(|retry_err| {
        debug!("retry failed: {}", retry_err);
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use scoring_model::{
        Artifact, ColumnSelector, DictVectorizer, Estimator, LinearRegression, LogisticRegression,
        Pipeline, Transformer,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn binary_logit(n: usize) -> LogisticRegression {
        LogisticRegression {
            coef: vec![vec![0.5; n]],
            intercept: vec![0.0],
            classes: vec![json!(0), json!(1)],
        }
    }

    #[test]
    fn prepare_wraps_objects_and_keeps_lists() {
        let rec = json!({"job": "management"});
        assert_eq!(prepare_input(rec.clone()), ModelInput::Records(vec![rec.clone()]));
        assert_eq!(
            prepare_input(json!([rec.clone(), rec.clone()])),
            ModelInput::Records(vec![rec.clone(), rec])
        );
        assert_eq!(prepare_input(json!(5)), ModelInput::Records(vec![json!(5)]));
    }

    #[test]
    fn binary_proba_reduces_to_positive_column() {
        let model = Artifact::LogisticRegression(binary_logit(1));
        let scores = score(&model, ModelInput::Matrix(array![[0.0], [2.0]])).unwrap();

        match &scores {
            Scores::Positive(p) => {
                assert!((p[0] - 0.5).abs() < 1e-12);
                assert!(p[1] > 0.5);
            }
            other => panic!("expected positive-class scores, got {:?}", other),
        }
        assert_eq!(scores.first().unwrap(), json!(0.5));
    }

    #[test]
    fn multiclass_proba_keeps_rows() {
        let model = Artifact::LogisticRegression(LogisticRegression {
            coef: vec![vec![0.0], vec![0.0], vec![0.0]],
            intercept: vec![0.0, 0.0, 0.0],
            classes: vec![json!("a"), json!("b"), json!("c")],
        });
        let scores = score(&model, ModelInput::Matrix(array![[1.0]])).unwrap();

        let Scores::Rows(rows) = &scores else {
            panic!("expected rows, got {:?}", scores);
        };
        assert_eq!(rows[0].len(), 3);
        assert!(scores.first().unwrap().is_array());
    }

    #[test]
    fn falls_back_to_predict() {
        let model = Artifact::LinearRegression(LinearRegression { coef: vec![1.0, 1.0], intercept: 0.0 });
        let scores = score(&model, ModelInput::Matrix(array![[1.0, 2.0]])).unwrap();
        assert_eq!(scores, Scores::Labels(vec![json!(3.0)]));
    }

    #[test]
    fn transformer_only_artifact_fails() {
        let model = Artifact::DictVectorizer(DictVectorizer::new(["a"]));
        let err = score(&model, prepare_input(json!({"a": 1}))).unwrap_err();
        assert_eq!(err.to_string(), "Loaded object has neither predict_proba nor predict");
    }

    #[test]
    fn records_retry_as_frame() {
        let model = Artifact::Pipeline(Pipeline {
            steps: vec![Transformer::ColumnSelector(ColumnSelector {
                columns: vec!["views".into(), "income".into()],
            })],
            estimator: Estimator::LogisticRegression(binary_logit(2)),
        });

        let scores = score(&model, prepare_input(json!({"views": 0, "income": 0.0}))).unwrap();
        assert_eq!(scores, Scores::Positive(vec![0.5]));
    }

    #[test]
    fn frame_retries_as_records() {
        let model = Artifact::Pipeline(Pipeline {
            steps: vec![Transformer::DictVectorizer(DictVectorizer::new(["x"]))],
            estimator: Estimator::LinearRegression(LinearRegression { coef: vec![2.0], intercept: 1.0 }),
        });
        let frame = Frame::from_records(&[json!({"x": 4})]).unwrap();

        let scores = score(&model, ModelInput::Frame(frame)).unwrap();
        assert_eq!(scores, Scores::Labels(vec![json!(9.0)]));
    }

    #[test]
    fn original_error_survives_failed_retry() {
        let model = Artifact::Pipeline(Pipeline {
            steps: vec![Transformer::DictVectorizer(DictVectorizer::new(["x"]))],
            estimator: Estimator::LogisticRegression(binary_logit(1)),
        });

        let err = score(&model, prepare_input(json!({"x": {"nested": true}}))).unwrap_err();
        assert!(matches!(err, ModelError::Feature(_)), "got {:?}", err);
    }

    struct CountingPredictor {
        calls: AtomicUsize,
    }

    impl Predictor for CountingPredictor {
        fn predict_proba(&self, _: &ModelInput) -> Option<Result<Array2<f64>, ModelError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(Err(ModelError::shape("always fails")))
        }

        fn predict(&self, _: &ModelInput) -> Option<Result<Vec<Value>, ModelError>> {
            None
        }
    }

    #[test]
    fn matrix_input_is_not_retried() {
        let p = CountingPredictor { calls: AtomicUsize::new(0) };
        assert!(score(&p, ModelInput::Matrix(array![[1.0]])).is_err());
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_mapping_records_are_not_retried() {
        let p = CountingPredictor { calls: AtomicUsize::new(0) };
        assert!(score(&p, prepare_input(json!("text"))).is_err());
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scores_serialize_as_lists() {
        assert_eq!(serde_json::to_value(Scores::Positive(vec![0.25])).unwrap(), json!([0.25]));
        assert_eq!(
            serde_json::to_value(Scores::Labels(vec![json!("yes")])).unwrap(),
            json!(["yes"])
        );
    }

    #[test]
    fn empty_scores_have_no_first() {
        assert!(matches!(Scores::Positive(vec![]).first(), Err(ModelError::EmptyOutput)));
    }
}
