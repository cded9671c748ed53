//! Feature transformers: turn records or frames into a numeric matrix.

use std::collections::HashMap;

use ndarray::Array2;
use scoring_core::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::{Frame, ModelInput};

fn default_separator() -> String {
    "=".to_string()
}

/// One-hot encodes string values and passes numbers through, keyed by the
/// feature names fixed at fit time.
///
/// | value | feature | cell |
/// |-------|---------|------|
/// | string `s` | `key=s` | 1.0 |
/// | number `n` | `key` | n |
/// | bool | `key` | 1.0 / 0.0 |
/// | list of strings | `key=item` per item | 1.0 |
/// | null | skipped | |
///
/// Features not seen at fit time are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictVectorizer {
    pub feature_names: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl DictVectorizer {
    pub fn new<I, S>(feature_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            feature_names: feature_names.into_iter().map(Into::into).collect(),
            separator: default_separator(),
        }
    }

    pub fn transform(&self, input: &ModelInput) -> Result<Array2<f64>, ModelError> {
        match input {
            ModelInput::Records(records) => self.transform_records(records),
            ModelInput::Frame(_) => Err(ModelError::shape(
                "DictVectorizer expects an iterable of mappings, got a frame of column names",
            )),
            ModelInput::Matrix(_) => Err(ModelError::shape(
                "DictVectorizer expects an iterable of mappings, got a numeric matrix",
            )),
        }
    }

    fn transform_records(&self, records: &[Value]) -> Result<Array2<f64>, ModelError> {
        let vocabulary: HashMap<&str, usize> = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut x = Array2::<f64>::zeros((records.len(), self.feature_names.len()));

        for (i, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                ModelError::shape("DictVectorizer expects an iterable of mappings")
            })?;

            let mut put = |name: &str, v: f64| {
                if let Some(&j) = vocabulary.get(name) {
                    x[[i, j]] += v;
                }
            };

            for (key, value) in obj {
                match value {
                    Value::Null => {}
                    Value::Bool(b) => put(key.as_str(), if *b { 1.0 } else { 0.0 }),
                    Value::Number(n) => {
                        let v = n.as_f64().ok_or_else(|| {
                            ModelError::feature(format!("feature '{}' is not representable as f64", key))
                        })?;
                        put(key.as_str(), v);
                    }
                    Value::String(s) => put(&format!("{}{}{}", key, self.separator, s), 1.0),
                    Value::Array(items) => {
                        for item in items {
                            let s = item.as_str().ok_or_else(|| {
                                ModelError::feature(format!(
                                    "unsupported value type in list for feature '{}': expected strings",
                                    key
                                ))
                            })?;
                            put(&format!("{}{}{}", key, self.separator, s), 1.0);
                        }
                    }
                    Value::Object(_) => {
                        return Err(ModelError::feature(format!(
                            "unsupported value type for feature '{}': nested mapping",
                            key
                        )))
                    }
                }
            }
        }

        Ok(x)
    }
}

/// Selects numeric columns by name from a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelector {
    pub columns: Vec<String>,
}

impl ColumnSelector {
    pub fn transform(&self, input: &ModelInput) -> Result<Array2<f64>, ModelError> {
        match input {
            ModelInput::Frame(frame) => self.select(frame),
            other => Err(ModelError::shape(format!(
                "ColumnSelector expects a frame with named columns, got {}",
                other.kind()
            ))),
        }
    }

    fn select(&self, frame: &Frame) -> Result<Array2<f64>, ModelError> {
        let indices = self
            .columns
            .iter()
            .map(|c| {
                frame
                    .column_index(c)
                    .ok_or_else(|| ModelError::shape(format!("column '{}' not found in frame", c)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut x = Array2::<f64>::zeros((frame.rows.len(), indices.len()));
        for (i, row) in frame.rows.iter().enumerate() {
            for (j, &idx) in indices.iter().enumerate() {
                x[[i, j]] = match row.get(idx).unwrap_or(&Value::Null) {
                    Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
                    Value::Bool(b) => f64::from(u8::from(*b)),
                    other => {
                        return Err(ModelError::feature(format!(
                            "column '{}' holds a non-numeric value: {}",
                            self.columns[j], other
                        )))
                    }
                };
            }
        }

        Ok(x)
    }
}

/// Centers and scales each column of a numeric matrix: `(x - mean) / scale`.
///
/// Only valid after a step that already produced a matrix. A zero scale
/// leaves the centered column as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, input: &ModelInput) -> Result<Array2<f64>, ModelError> {
        let x = match input {
            ModelInput::Matrix(x) => x,
            other => {
                return Err(ModelError::shape(format!(
                    "StandardScaler expects a numeric matrix, got {}",
                    other.kind()
                )))
            }
        };
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::shape(format!(
                "StandardScaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if x.ncols() != self.mean.len() {
            return Err(ModelError::Dimension { expected: self.mean.len(), found: x.ncols() });
        }

        let mut out = x.clone();
        for mut row in out.rows_mut() {
            for (j, v) in row.iter_mut().enumerate() {
                let scale = if self.scale[j] == 0.0 { 1.0 } else { self.scale[j] };
                *v = (*v - self.mean[j]) / scale;
            }
        }
        Ok(out)
    }
}

/// A fitted preprocessing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transformer {
    DictVectorizer(DictVectorizer),
    ColumnSelector(ColumnSelector),
    StandardScaler(StandardScaler),
}

impl Transformer {
    pub fn transform(&self, input: &ModelInput) -> Result<Array2<f64>, ModelError> {
        match self {
            Transformer::DictVectorizer(dv) => dv.transform(input),
            Transformer::ColumnSelector(cs) => cs.transform(input),
            Transformer::StandardScaler(ss) => ss.transform(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bank_vectorizer() -> DictVectorizer {
        DictVectorizer::new([
            "duration",
            "job=management",
            "job=technician",
            "poutcome=failure",
            "poutcome=success",
        ])
    }

    #[test]
    fn one_hot_and_numeric_features() {
        let customer = json!({"job": "management", "duration": 400, "poutcome": "success"});
        let x = bank_vectorizer()
            .transform(&ModelInput::Records(vec![customer]))
            .unwrap();

        assert_eq!(x.shape(), &[1, 5]);
        assert_eq!(x.row(0).to_vec(), vec![400.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_categories_and_nulls_are_ignored() {
        let customer = json!({"job": "astronaut", "duration": null, "extra": 3});
        let x = bank_vectorizer()
            .transform(&ModelInput::Records(vec![customer]))
            .unwrap();
        assert!(x.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn string_lists_expand_per_item() {
        let dv = DictVectorizer::new(["tags=a", "tags=b", "flag"]);
        let x = dv
            .transform(&ModelInput::Records(vec![json!({"tags": ["a", "b"], "flag": true})]))
            .unwrap();
        assert_eq!(x.row(0).to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn nested_mapping_is_rejected() {
        let err = bank_vectorizer()
            .transform(&ModelInput::Records(vec![json!({"job": {"title": "x"}})]))
            .unwrap_err();
        assert!(matches!(err, ModelError::Feature(_)));
    }

    #[test]
    fn vectorizer_rejects_frames() {
        let frame = Frame::from_records(&[json!({"duration": 1})]).unwrap();
        let err = bank_vectorizer().transform(&ModelInput::Frame(frame)).unwrap_err();
        assert!(matches!(err, ModelError::Shape(_)));
    }

    #[test]
    fn selector_reads_named_columns() {
        let frame = Frame::from_records(&[
            json!({"income": 10.5, "views": 2, "active": true}),
            json!({"income": 3.0, "views": 0, "active": false}),
        ])
        .unwrap();
        let selector = ColumnSelector { columns: vec!["views".into(), "income".into(), "active".into()] };

        let x = selector.transform(&ModelInput::Frame(frame)).unwrap();
        assert_eq!(x.row(0).to_vec(), vec![2.0, 10.5, 1.0]);
        assert_eq!(x.row(1).to_vec(), vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn selector_rejects_records_and_missing_columns() {
        let selector = ColumnSelector { columns: vec!["views".into()] };
        let err = selector
            .transform(&ModelInput::Records(vec![json!({"views": 1})]))
            .unwrap_err();
        assert!(err.to_string().contains("got records"));

        let frame = Frame::from_records(&[json!({"income": 1})]).unwrap();
        let err = selector.transform(&ModelInput::Frame(frame)).unwrap_err();
        assert_eq!(err.to_string(), "column 'views' not found in frame");
    }

    #[test]
    fn transformer_tag_roundtrips_through_json() {
        let doc = json!({"kind": "dict_vectorizer", "feature_names": ["a", "b=x"]});
        let t: Transformer = serde_json::from_value(doc).unwrap();
        match t {
            Transformer::DictVectorizer(dv) => {
                assert_eq!(dv.feature_names.len(), 2);
                assert_eq!(dv.separator, "=");
            }
            other => panic!("unexpected transformer: {:?}", other),
        }
    }

    #[test]
    fn scaler_centers_and_scales_columns() {
        let scaler = StandardScaler { mean: vec![1.0, 10.0], scale: vec![2.0, 0.0] };
        let x = scaler
            .transform(&ModelInput::Matrix(ndarray::array![[3.0, 12.0], [1.0, 10.0]]))
            .unwrap();
        assert_eq!(x, ndarray::array![[1.0, 2.0], [0.0, 0.0]]);
    }

    #[test]
    fn scaler_rejects_records_and_wrong_width() {
        let scaler = StandardScaler { mean: vec![0.0], scale: vec![1.0] };
        let err = scaler
            .transform(&ModelInput::Records(vec![json!({"a": 1})]))
            .unwrap_err();
        assert_eq!(err.to_string(), "StandardScaler expects a numeric matrix, got records");

        let err = scaler
            .transform(&ModelInput::Matrix(ndarray::array![[1.0, 2.0]]))
            .unwrap_err();
        assert!(matches!(err, ModelError::Dimension { expected: 1, found: 2 }));
    }
}
