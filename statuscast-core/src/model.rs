//! Decision-forest classifier: artifact deserialization and inference.
//!
//! The artifact is a JSON export of a trained forest: an ordered class
//! list plus decision trees whose leaves carry per-class probability
//! vectors. The label set is a deployment-time property of the artifact
//! and is always enumerated from the loaded file, never hardcoded.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of input features the classifier was trained on.
pub const FEATURE_COUNT: usize = 3;

/// A loaded classification model.
///
/// The prediction service depends only on this seam; [`ForestModel`] is
/// one implementation of it.
pub trait Classifier {
    /// Class labels in the classifier's native order.
    fn classes(&self) -> &[String];

    /// Predicted label for a single feature row.
    fn predict_label(&self, features: &[f64; FEATURE_COUNT]) -> Result<String, PredictError>;

    /// Per-class probability distribution for a single feature row,
    /// aligned with `classes()`.
    fn predict_distribution(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<Vec<f64>, PredictError>;
}

/// A node of a serialized decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

impl TreeNode {
    /// Walk the tree for one feature row. `feature <= threshold` goes left.
    fn evaluate<'a>(&'a self, features: &[f64; FEATURE_COUNT]) -> &'a [f64] {
        match self {
            TreeNode::Leaf { distribution } => distribution,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if features[*feature] <= *threshold {
                    left.evaluate(features)
                } else {
                    right.evaluate(features)
                }
            }
        }
    }

    fn check(&self, n_classes: usize) -> Result<(), PredictError> {
        match self {
            TreeNode::Leaf { distribution } => {
                if distribution.len() != n_classes {
                    return Err(PredictError::load(format!(
                        "leaf distribution has {} entries, expected {n_classes}",
                        distribution.len()
                    )));
                }
                Ok(())
            }
            TreeNode::Split {
                feature, left, right, ..
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(PredictError::load(format!(
                        "split references feature {feature}, model takes {FEATURE_COUNT}"
                    )));
                }
                left.check(n_classes)?;
                right.check(n_classes)
            }
        }
    }
}

/// A random-forest classifier deserialized from the cached artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub classes: Vec<String>,
    pub trees: Vec<TreeNode>,
}

impl ForestModel {
    /// Load and structurally validate a serialized forest.
    ///
    /// A corrupt cache file surfaces here as a load error; the file is
    /// left in place and will fail the same way on the next run.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let raw = std::fs::read(path)
            .map_err(|e| PredictError::load(format!("cannot read model file: {e}")))?;
        let model: ForestModel = serde_json::from_slice(&raw)
            .map_err(|e| PredictError::load(format!("cannot parse model file: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), PredictError> {
        if self.classes.is_empty() {
            return Err(PredictError::load("model declares no classes"));
        }
        if self.trees.is_empty() {
            return Err(PredictError::load("model contains no trees"));
        }
        for tree in &self.trees {
            tree.check(self.classes.len())?;
        }
        Ok(())
    }
}

impl Classifier for ForestModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_label(&self, features: &[f64; FEATURE_COUNT]) -> Result<String, PredictError> {
        let distribution = self.predict_distribution(features)?;
        // Equal probabilities resolve to the earlier class.
        let mut best = 0;
        for (i, p) in distribution.iter().enumerate().skip(1) {
            if *p > distribution[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }

    fn predict_distribution(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<Vec<f64>, PredictError> {
        let mut sum = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.evaluate(features)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut sum {
            *p /= n;
        }
        Ok(sum)
    }
}
