//! Configuration for the prediction utility.
//!
//! Uses `figment` for layered configuration: defaults -> `statuscast.toml`
//! in the working directory -> `STATUSCAST_*` environment variables. The
//! defaults encode the fixed artifact URL and cache location; overrides
//! exist for deployments that mirror the artifact and for hermetic tests.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PredictError;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictConfig {
    /// Remote URL serving the serialized classifier.
    #[serde(default = "default_model_url")]
    pub model_url: String,
    /// File name of the cached artifact inside `cache_dir`.
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Directory holding the cached artifact. System temp dir if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Bound on the artifact download, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            model_url: default_model_url(),
            model_file: default_model_file(),
            cache_dir: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_model_url() -> String {
    "https://storage.googleapis.com/model-random-forest/random_forest_model.json".to_string()
}

fn default_model_file() -> String {
    "random_forest_model.json".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl PredictConfig {
    /// Resolved path of the cached model artifact.
    ///
    /// The path is stable across invocations so a downloaded artifact is
    /// reused by every later run on the same machine.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .join(&self.model_file)
    }
}

/// Load configuration: defaults, then `statuscast.toml`, then `STATUSCAST_*`.
pub fn load_config() -> Result<PredictConfig, PredictError> {
    Figment::from(Serialized::defaults(PredictConfig::default()))
        .merge(Toml::file("statuscast.toml"))
        .merge(Env::prefixed("STATUSCAST_"))
        .extract()
        .map_err(|e| PredictError::config(e.to_string()))
}
