//! # Scoring - serve pre-trained tabular models
//!
//! Loads a model artifact exported by the training side, reshapes incoming
//! records, and calls the best prediction method the artifact offers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scoring::prelude::*;
//!
//! let pipeline = load_artifact("pipeline_v1.bin")?;
//! let scores = score(&pipeline, prepare_input(record))?;
//! println!("{}", scores.first()?);
//! ```
//!
//! ## Crate Structure
//!
//! | Crate | Description |
//! |-------|-------------|
//! | [`scoring_core`] | Error type, lead record |
//! | [`scoring_model`] | Artifacts, transformers, estimators |
//! | [`scoring_engine`] | Input preparation and prediction dispatch |
//! | [`scoring_config`] | Environment-driven service settings |
//! | `scoring_server` | Axum services (feature `server`) |

// Re-export core types
pub use scoring_core::{LeadRecord, ModelError};

// Re-export model types
pub use scoring_model::{
    load_artifact, Artifact, ColumnSelector, DictVectorizer, Estimator, Frame, LinearRegression,
    LogisticRegression, ModelInput, Pipeline, Predictor, StandardScaler,
    Transformer,
};

// Re-export engine
pub use scoring_engine::{prepare_input, score, Scores};

// Re-export config
pub use scoring_config::{ClientServiceConfig, ConfigError, PipelineServiceConfig};

#[cfg(feature = "server")]
pub use scoring_server as server;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use scoring::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{load_artifact, prepare_input, score};
    pub use crate::{Artifact, ModelError, ModelInput, Predictor, Scores};
}
