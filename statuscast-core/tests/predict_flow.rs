//! End-to-end prediction flow against a fixture artifact, no network.
//!
//! The cache directory is pointed at a tempdir holding a small forest, so
//! the fetcher finds the artifact already present and the full
//! fetch -> load -> validate -> infer -> normalize path runs hermetically.

use pretty_assertions::assert_eq;
use statuscast_core::config::PredictConfig;
use statuscast_core::predict::{PredictionResult, Predictor};
use tempfile::TempDir;

fn fixture_forest() -> serde_json::Value {
    serde_json::json!({
        "classes": ["Aman", "Siaga", "Bermasalah"],
        "trees": [
            {
                "feature": 0,
                "threshold": 2.5,
                "left": { "distribution": [0.0, 0.2, 0.8] },
                "right": {
                    "feature": 1,
                    "threshold": 60.0,
                    "left": { "distribution": [0.2, 0.6, 0.2] },
                    "right": { "distribution": [0.9, 0.1, 0.0] }
                }
            },
            {
                "feature": 2,
                "threshold": 0.5,
                "left": { "distribution": [0.8, 0.1, 0.1] },
                "right": { "distribution": [0.3, 0.3, 0.4] }
            }
        ]
    })
}

/// Config whose cache dir already holds the fixture; the URL is
/// unreachable so any network access would fail the test.
fn cached_config(dir: &TempDir) -> PredictConfig {
    let path = dir.path().join("forest.json");
    std::fs::write(&path, serde_json::to_vec(&fixture_forest()).unwrap()).unwrap();
    PredictConfig {
        model_url: "http://127.0.0.1:1/forest.json".into(),
        model_file: "forest.json".into(),
        cache_dir: Some(dir.path().to_path_buf()),
        fetch_timeout_secs: 1,
    }
}

#[tokio::test]
async fn test_valid_input_produces_success_record() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    let result = predictor.predict("3.8", "85", "0").await;
    let PredictionResult::Success(prediction) = result else {
        panic!("expected success");
    };

    assert!(prediction.success);
    assert_eq!(prediction.predicted_status, "aman");
    assert_eq!(prediction.confidence, 85.0);
    assert_eq!(prediction.probabilities["aman"], 85.0);
    assert_eq!(prediction.probabilities["siaga"], 10.0);
    assert_eq!(prediction.probabilities["bermasalah"], 5.0);
}

#[tokio::test]
async fn test_probability_keys_follow_classifier_order() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    let result = predictor.predict("2.0", "50", "1").await;
    let PredictionResult::Success(prediction) = result else {
        panic!("expected success");
    };

    let keys: Vec<&str> = prediction.probabilities.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["aman", "siaga", "bermasalah"]);
    assert_eq!(prediction.predicted_status, "bermasalah");
}

#[tokio::test]
async fn test_probabilities_sum_to_one_hundred_across_domain() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    for (gpa, score, fin) in [
        ("0.0", "0", "0"),
        ("2.5", "60", "1"),
        ("3.2", "77.5", "0"),
        ("4.0", "100", "1"),
    ] {
        let result = predictor.predict(gpa, score, fin).await;
        let PredictionResult::Success(prediction) = result else {
            panic!("expected success for ({gpa}, {score}, {fin})");
        };

        assert!(prediction.confidence >= 0.0 && prediction.confidence <= 100.0);
        let sum: f64 = prediction
            .probabilities
            .values()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert!(
            (sum - 100.0).abs() <= 0.1,
            "probabilities for ({gpa}, {score}, {fin}) sum to {sum}"
        );
    }
}

#[tokio::test]
async fn test_repeated_invocations_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    let first = serde_json::to_string(&predictor.predict("3.1", "72", "1").await).unwrap();
    let second = serde_json::to_string(&predictor.predict("3.1", "72", "1").await).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_range_violations_report_fixed_messages() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    let cases = [
        (("-0.1", "50", "0"), "IPK must be between 0.0 and 4.0"),
        (("3.0", "150", "0"), "Skor psikologi must be between 0 and 100"),
        (("3.0", "50", "2"), "Finansial must be 0 or 1"),
    ];
    for ((gpa, score, fin), expected) in cases {
        let result = predictor.predict(gpa, score, fin).await;
        let PredictionResult::Failure(failure) = result else {
            panic!("expected failure for ({gpa}, {score}, {fin})");
        };
        assert!(!failure.success);
        assert_eq!(failure.error, expected);
    }
}

#[tokio::test]
async fn test_non_numeric_input_is_recovered_error() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    let result = predictor.predict("abc", "50", "0").await;
    let PredictionResult::Failure(failure) = result else {
        panic!("expected failure");
    };
    assert!(failure.error.starts_with("Invalid input values: "));
    assert!(failure.error.contains("abc"));
}

#[tokio::test]
async fn test_missing_artifact_with_unreachable_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = PredictConfig {
        model_url: "http://127.0.0.1:1/forest.json".into(),
        model_file: "forest.json".into(),
        cache_dir: Some(dir.path().to_path_buf()),
        fetch_timeout_secs: 1,
    };
    let predictor = Predictor::new(config);

    let result = predictor.predict("3.0", "50", "0").await;
    let PredictionResult::Failure(failure) = result else {
        panic!("expected failure");
    };
    assert_eq!(failure.error, "Failed to download model");
}

#[tokio::test]
async fn test_corrupt_artifact_surfaces_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.json");
    std::fs::write(&path, b"definitely not a forest").unwrap();
    let config = PredictConfig {
        model_url: "http://127.0.0.1:1/forest.json".into(),
        model_file: "forest.json".into(),
        cache_dir: Some(dir.path().to_path_buf()),
        fetch_timeout_secs: 1,
    };
    let predictor = Predictor::new(config);

    let result = predictor.predict("3.0", "50", "0").await;
    let PredictionResult::Failure(failure) = result else {
        panic!("expected failure");
    };
    assert!(failure.error.contains("cannot parse model file"));
}

#[tokio::test]
async fn test_result_serializes_to_a_single_json_line() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = Predictor::new(cached_config(&dir));

    for input in [("3.8", "85", "0"), ("abc", "85", "0"), ("-1", "85", "0")] {
        let result = predictor.predict(input.0, input.1, input.2).await;
        let line = serde_json::to_string(&result).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value.get("success").is_some());
    }
}
