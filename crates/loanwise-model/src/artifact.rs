use serde::{Deserialize, Serialize};

use crate::{DecisionTree, LogisticRegression, ModelError, RandomForest};

fn default_classes() -> [u8; 2] {
    [0, 1]
}

/// On-disk form of a trained classifier.
///
/// The envelope fields are shared by every estimator; the estimator itself is
/// selected by the `"kind"` tag:
///
/// ```json
/// {
///   "kind": "logistic_regression",
///   "n_features_in": 2,
///   "classes": [0, 1],
///   "coefficients": [0.4, -1.2],
///   "intercept": 0.1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub n_features_in: usize,
    /// Column names in training order, when the exporter recorded them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Class labels; index 1 is the positive class.
    #[serde(default = "default_classes")]
    pub classes: [u8; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub estimator: Estimator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression(_) => "logistic_regression",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest(_) => "random_forest",
        }
    }
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8], origin: &str) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|source| ModelError::Malformed {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features_in == 0 {
            return Err(ModelError::invalid("n_features_in must be at least 1"));
        }
        if self.classes[0] == self.classes[1] {
            return Err(ModelError::invalid(format!(
                "classes must be two distinct labels, got {:?}",
                self.classes
            )));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features_in {
                return Err(ModelError::invalid(format!(
                    "{} feature names listed but n_features_in is {}",
                    names.len(),
                    self.n_features_in
                )));
            }
        }
        match &self.estimator {
            Estimator::LogisticRegression(model) => model.validate(self.n_features_in),
            Estimator::DecisionTree(tree) => tree.validate(self.n_features_in, &self.classes),
            Estimator::RandomForest(forest) => forest.validate(self.n_features_in, &self.classes),
        }
    }
}
