//! Artifact acquisition and caching.
//!
//! The classifier is an opaque pre-trained artifact served from a fixed
//! URL. It is downloaded at most once into a well-known cache path and
//! every later invocation reuses the file as-is; there is no checksum,
//! expiry, or version negotiation.

use crate::config::PredictConfig;
use crate::error::PredictError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current version, sent as the HTTP user agent.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetches the model artifact into the local cache.
pub struct ArtifactFetcher {
    config: PredictConfig,
}

impl ArtifactFetcher {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    /// Return the cached artifact path, downloading it first if absent.
    ///
    /// An existing file is returned immediately with no network access.
    /// Independent processes may race to populate the same path; the
    /// atomic rename in [`write_atomic`] keeps a half-written file from
    /// ever satisfying the existence check.
    pub async fn ensure_available(&self) -> Result<PathBuf, PredictError> {
        let target = self.config.cache_path();
        if target.exists() {
            tracing::debug!(path = %target.display(), "Using cached model");
            return Ok(target);
        }

        tracing::info!(url = %self.config.model_url, "Downloading model...");
        let client = reqwest::Client::builder()
            .user_agent(format!("statuscast/{VERSION}"))
            .timeout(Duration::from_secs(self.config.fetch_timeout_secs))
            .build()?;

        let response = client.get(&self.config.model_url).send().await?;
        if !response.status().is_success() {
            return Err(PredictError::fetch(format!(
                "model server returned status {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await?;

        write_atomic(&target, &bytes)?;
        tracing::info!(path = %target.display(), "Model downloaded successfully");
        Ok(target)
    }
}

/// Write `bytes` to a `.part` sibling of `target`, then rename into place.
fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), PredictError> {
    let mut part = target.as_os_str().to_os_string();
    part.push(".part");
    let part = PathBuf::from(part);

    if let Err(e) = std::fs::write(&part, bytes) {
        let _ = std::fs::remove_file(&part);
        return Err(e.into());
    }
    if let Err(e) = std::fs::rename(&part, target) {
        let _ = std::fs::remove_file(&part);
        return Err(e.into());
    }
    Ok(())
}
