//! # statuscast-core — student-status prediction engine
//!
//! Acquires a pre-trained decision-forest artifact into a local cache,
//! loads it, and turns three raw student attributes (IPK, psychology
//! score, financial flag) into a normalized JSON-ready prediction record.
//!
//! The flow is strictly sequential: fetch -> load -> validate -> infer ->
//! normalize. All diagnostics go through `tracing`; the result record is
//! the only machine-readable output.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod predict;

pub use config::{load_config, PredictConfig};
pub use error::PredictError;
pub use fetch::ArtifactFetcher;
pub use model::{Classifier, ForestModel};
pub use predict::{PredictionRequest, PredictionResult, Predictor};
