//! Input shapes accepted by artifacts.

use ndarray::Array2;
use scoring_core::ModelError;
use serde_json::{Map, Value};

/// Data handed to a [`Predictor`](crate::Predictor).
///
/// Different steps consume different shapes: a dict vectorizer wants
/// mapping-like rows, a column selector wants named columns, and estimators
/// want a numeric matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelInput {
    /// A list of records, normally JSON objects.
    Records(Vec<Value>),
    /// Tabular data with named columns.
    Frame(Frame),
    /// Numeric feature matrix (one row per record).
    Matrix(Array2<f64>),
}

impl ModelInput {
    /// Short name of the shape, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelInput::Records(_) => "records",
            ModelInput::Frame(_) => "frame",
            ModelInput::Matrix(_) => "matrix",
        }
    }
}

/// Column-oriented view of a set of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Builds a frame from JSON object rows.
    ///
    /// Columns are the union of keys in first-seen order. Cells missing from
    /// a row are `null`.
    pub fn from_records(records: &[Value]) -> Result<Self, ModelError> {
        let mut columns: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                ModelError::shape(format!("record {} is not a mapping and cannot become a frame row", i))
            })?;
            for key in obj.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            objects.push(obj);
        }

        let rows = objects
            .iter()
            .map(|obj| {
                columns
                    .iter()
                    .map(|c| obj.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Converts the frame back into one JSON object per row.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }

    /// Returns the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
