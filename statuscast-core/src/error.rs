//! Error types for the statuscast-core crate.

use thiserror::Error;

/// Top-level error type for prediction operations.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Invalid input values: {0}")]
    Coercion(String),

    #[error("{0}")]
    Range(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PredictError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn coercion(msg: impl Into<String>) -> Self {
        Self::Coercion(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_is_bare_message() {
        let err = PredictError::range("IPK must be between 0.0 and 4.0");
        assert_eq!(err.to_string(), "IPK must be between 0.0 and 4.0");
    }

    #[test]
    fn test_coercion_error_prefix() {
        let err = PredictError::coercion("ipk must be a number, got \"abc\"");
        assert!(err.to_string().starts_with("Invalid input values: "));
    }
}
