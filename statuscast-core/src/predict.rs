//! Prediction service: input coercion, range validation, inference, and
//! the JSON result contract.
//!
//! The result record is the sole machine-readable output of the process,
//! so its shape is frozen: a success carries exactly the predicted label,
//! confidence, probability map, and input echo; a failure carries exactly
//! an error message. Callers inspect the `success` field.

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::fetch::ArtifactFetcher;
use crate::model::{Classifier, ForestModel, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validated prediction input. Immutable once constructed.
///
/// Serialized under the wire names the consuming service expects
/// (`ipk`, `skor_psikologi`, `finansial`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "ipk")]
    pub gpa: f64,
    #[serde(rename = "skor_psikologi")]
    pub psychology_score: f64,
    #[serde(rename = "finansial")]
    pub financial_status: i64,
}

impl PredictionRequest {
    /// Coerce and range-check the three raw CLI strings.
    ///
    /// All three are coerced before any range check; range checks run in
    /// fixed order and the first violation wins.
    pub fn parse(gpa_raw: &str, psych_raw: &str, fin_raw: &str) -> Result<Self, PredictError> {
        let gpa = coerce_f64("ipk", gpa_raw)?;
        let psychology_score = coerce_f64("skor_psikologi", psych_raw)?;
        let financial_status = coerce_i64("finansial", fin_raw)?;

        if !(0.0..=4.0).contains(&gpa) {
            return Err(PredictError::range("IPK must be between 0.0 and 4.0"));
        }
        if !(0.0..=100.0).contains(&psychology_score) {
            return Err(PredictError::range(
                "Skor psikologi must be between 0 and 100",
            ));
        }
        if financial_status != 0 && financial_status != 1 {
            return Err(PredictError::range("Finansial must be 0 or 1"));
        }

        Ok(Self {
            gpa,
            psychology_score,
            financial_status,
        })
    }

    /// Feature row in training column order: IPK, skor psikologi, finansial.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.gpa, self.psychology_score, self.financial_status as f64]
    }
}

fn coerce_f64(name: &str, raw: &str) -> Result<f64, PredictError> {
    raw.trim()
        .parse()
        .map_err(|_| PredictError::coercion(format!("{name} must be a number, got \"{raw}\"")))
}

fn coerce_i64(name: &str, raw: &str) -> Result<i64, PredictError> {
    raw.trim()
        .parse()
        .map_err(|_| PredictError::coercion(format!("{name} must be an integer, got \"{raw}\"")))
}

/// Result record emitted on stdout, parsed as JSON by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Success(Prediction),
    Failure(PredictionFailure),
}

/// The success arm of [`PredictionResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub success: bool,
    /// Lowercase-normalized predicted class label.
    pub predicted_status: String,
    /// Maximum class probability as a percentage, 2 decimals.
    pub confidence: f64,
    /// Percentage per lowercase class label, in classifier class order.
    pub probabilities: Map<String, Value>,
    /// Echo of the coerced input values.
    pub input_data: PredictionRequest,
}

/// The failure arm of [`PredictionResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionFailure {
    pub success: bool,
    pub error: String,
}

impl PredictionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(PredictionFailure {
            success: false,
            error: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Round to 2 decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The prediction service: fetch, load, validate, infer, normalize.
pub struct Predictor {
    fetcher: ArtifactFetcher,
}

impl Predictor {
    pub fn new(config: PredictConfig) -> Self {
        Self {
            fetcher: ArtifactFetcher::new(config),
        }
    }

    /// Run one prediction over the raw CLI arguments.
    ///
    /// Every fallible step folds into the JSON error shape; this never
    /// returns `Err` and never panics across the process boundary.
    pub async fn predict(
        &self,
        gpa_raw: &str,
        psych_raw: &str,
        fin_raw: &str,
    ) -> PredictionResult {
        let model_path = match self.fetcher.ensure_available().await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Model fetch failed");
                return PredictionResult::failure("Failed to download model");
            }
        };

        let model = match ForestModel::load(&model_path) {
            Ok(model) => model,
            Err(e) => return PredictionResult::failure(e.to_string()),
        };

        let request = match PredictionRequest::parse(gpa_raw, psych_raw, fin_raw) {
            Ok(request) => request,
            Err(e) => return PredictionResult::failure(e.to_string()),
        };

        classify(&model, request)
    }
}

/// Inference and postprocessing against an already-loaded classifier.
pub fn classify(model: &dyn Classifier, request: PredictionRequest) -> PredictionResult {
    let features = request.features();
    tracing::info!(
        ipk = request.gpa,
        skor_psikologi = request.psychology_score,
        finansial = request.financial_status,
        "Input"
    );

    let label = match model.predict_label(&features) {
        Ok(label) => label,
        Err(e) => return PredictionResult::failure(e.to_string()),
    };
    let distribution = match model.predict_distribution(&features) {
        Ok(distribution) => distribution,
        Err(e) => return PredictionResult::failure(e.to_string()),
    };

    tracing::info!(prediction = %label, "Prediction");
    tracing::info!(classes = ?model.classes(), "Classes");

    let confidence = distribution.iter().copied().fold(0.0_f64, f64::max);

    let mut probabilities = Map::new();
    for (class, p) in model.classes().iter().zip(&distribution) {
        probabilities.insert(class.to_lowercase(), Value::from(round2(p * 100.0)));
    }

    PredictionResult::Success(Prediction {
        success: true,
        predicted_status: label.to_lowercase(),
        confidence: round2(confidence * 100.0),
        probabilities,
        input_data: request,
    })
}
