//! Linear estimators exported from the training side.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use scoring_core::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::ModelInput;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn expect_matrix<'a>(input: &'a ModelInput, estimator: &str) -> Result<&'a Array2<f64>, ModelError> {
    match input {
        ModelInput::Matrix(x) => Ok(x),
        other => Err(ModelError::shape(format!(
            "{} expects a numeric feature matrix, got {}",
            estimator,
            other.kind()
        ))),
    }
}

fn check_width(x: &Array2<f64>, expected: usize) -> Result<(), ModelError> {
    if x.ncols() != expected {
        return Err(ModelError::Dimension { expected, found: x.ncols() });
    }
    Ok(())
}

fn dot(w: &[f64], row: ArrayView1<'_, f64>) -> f64 {
    w.iter().zip(row.iter()).map(|(a, b)| a * b).sum()
}

/// Binary or multinomial logistic regression.
///
/// A single coefficient row means a binary model whose row scores the
/// second class; otherwise there is one row per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub classes: Vec<Value>,
}

impl LogisticRegression {
    pub fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    fn decision_function(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut scores = Array2::<f64>::zeros((x.nrows(), self.coef.len()));
        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            for (k, w) in self.coef.iter().enumerate() {
                let b = self.intercept.get(k).copied().unwrap_or(0.0);
                scores[[i, k]] = dot(w, row) + b;
            }
        }
        scores
    }

    /// Class probabilities, one column per class.
    pub fn predict_proba(&self, input: &ModelInput) -> Result<Array2<f64>, ModelError> {
        let x = expect_matrix(input, "LogisticRegression")?;
        check_width(x, self.n_features())?;
        let scores = self.decision_function(x);

        if self.coef.len() == 1 {
            let mut proba = Array2::<f64>::zeros((x.nrows(), 2));
            for (i, z) in scores.column(0).iter().enumerate() {
                let p = sigmoid(*z);
                proba[[i, 0]] = 1.0 - p;
                proba[[i, 1]] = p;
            }
            return Ok(proba);
        }

        let mut proba = scores;
        for mut row in proba.axis_iter_mut(Axis(0)) {
            let max = row.fold(f64::NEG_INFINITY, |m, v| m.max(*v));
            row.mapv_inplace(|v| (v - max).exp());
            let total = row.sum();
            row.mapv_inplace(|v| v / total);
        }
        Ok(proba)
    }

    /// Most probable class label for each row.
    pub fn predict(&self, input: &ModelInput) -> Result<Vec<Value>, ModelError> {
        let proba = self.predict_proba(input)?;
        proba
            .axis_iter(Axis(0))
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |acc, (k, p)| if *p > acc.1 { (k, *p) } else { acc })
                    .0;
                self.classes.get(best).cloned().ok_or_else(|| {
                    ModelError::shape(format!("no class label for output column {}", best))
                })
            })
            .collect()
    }
}

/// Ordinary least squares regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn predict(&self, input: &ModelInput) -> Result<Vec<Value>, ModelError> {
        let x = expect_matrix(input, "LinearRegression")?;
        check_width(x, self.coef.len())?;
        let w = Array1::from(self.coef.clone());
        let y = x.dot(&w) + self.intercept;
        Ok(y.iter().map(|v| Value::from(*v)).collect())
    }
}

/// The final step of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    LinearRegression(LinearRegression),
}

impl Estimator {
    pub fn has_predict_proba(&self) -> bool {
        matches!(self, Estimator::LogisticRegression(_))
    }

    /// `None` when the estimator has no probability output.
    pub fn predict_proba(&self, input: &ModelInput) -> Option<Result<Array2<f64>, ModelError>> {
        match self {
            Estimator::LogisticRegression(m) => Some(m.predict_proba(input)),
            Estimator::LinearRegression(_) => None,
        }
    }

    pub fn predict(&self, input: &ModelInput) -> Option<Result<Vec<Value>, ModelError>> {
        match self {
            Estimator::LogisticRegression(m) => Some(m.predict(input)),
            Estimator::LinearRegression(m) => Some(m.predict(input)),
        }
    }
}
