//! Service configuration loaded from the environment.
//!
//! - [`PipelineServiceConfig`] - Single-file pipeline service
//! - [`ClientServiceConfig`] - Model + vectorizer service
//!
//! Every setting has a default, so a bare `from_env()` works out of the box.
//! A `.env` file in the working directory is read first when present.
//!
//! | Variable | Service | Default |
//! |----------|---------|---------|
//! | `PIPELINE_PATH` | pipeline | `pipeline_v1.bin` |
//! | `MODEL_PATH` | client | `model1.bin` |
//! | `DV_PATH` | client | `dv.bin` |
//! | `DECISION_THRESHOLD` | client | `0.5` |
//! | `HOST` | both | `0.0.0.0` |
//! | `PORT` | both | `8000` / `9696` |
//!
//! # Example
//!
//! ```rust
//! use scoring_config::PipelineServiceConfig;
//!
//! let config = PipelineServiceConfig::from_lookup(|key| match key {
//!     "PORT" => Some("8080".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.addr(), "0.0.0.0:8080");
//! assert_eq!(config.pipeline_path.to_str(), Some("pipeline_v1.bin"));
//! ```

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PIPELINE_PATH: &str = "pipeline_v1.bin";
pub const DEFAULT_PIPELINE_PORT: u16 = 8000;
pub const DEFAULT_MODEL_PATH: &str = "model1.bin";
pub const DEFAULT_DV_PATH: &str = "dv.bin";
pub const DEFAULT_CLIENT_PORT: u16 = 9696;
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Errors that can occur when reading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

fn parse_port(lookup: &impl Fn(&str) -> Option<String>, default: u16) -> Result<u16, ConfigError> {
    match lookup("PORT") {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid("PORT", &raw, e)),
        None => Ok(default),
    }
}

fn host(lookup: &impl Fn(&str) -> Option<String>) -> String {
    lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string())
}

fn path_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PathBuf {
    PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
}

/// Settings for the pipeline service.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineServiceConfig {
    pub host: String,
    pub port: u16,
    pub pipeline_path: PathBuf,
}

impl Default for PipelineServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PIPELINE_PORT,
            pipeline_path: PathBuf::from(DEFAULT_PIPELINE_PATH),
        }
    }
}

impl PipelineServiceConfig {
    /// Reads `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: host(&lookup),
            port: parse_port(&lookup, DEFAULT_PIPELINE_PORT)?,
            pipeline_path: path_or(&lookup, "PIPELINE_PATH", DEFAULT_PIPELINE_PATH),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the model + vectorizer service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientServiceConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub dv_path: PathBuf,
    /// Probability at or above which a record is classified positive.
    pub threshold: f64,
}

impl Default for ClientServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_CLIENT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dv_path: PathBuf::from(DEFAULT_DV_PATH),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ClientServiceConfig {
    /// Reads `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let threshold = match lookup("DECISION_THRESHOLD") {
            Some(raw) => {
                let t = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::invalid("DECISION_THRESHOLD", &raw, e))?;
                if !(0.0..=1.0).contains(&t) {
                    return Err(ConfigError::invalid(
                        "DECISION_THRESHOLD",
                        &raw,
                        "must be between 0 and 1",
                    ));
                }
                t
            }
            None => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            host: host(&lookup),
            port: parse_port(&lookup, DEFAULT_CLIENT_PORT)?,
            model_path: path_or(&lookup, "MODEL_PATH", DEFAULT_MODEL_PATH),
            dv_path: path_or(&lookup, "DV_PATH", DEFAULT_DV_PATH),
            threshold,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
