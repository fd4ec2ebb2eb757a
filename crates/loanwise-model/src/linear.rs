use serde::{Deserialize, Serialize};

use crate::ModelError;

fn default_threshold() -> f64 {
    0.5
}

/// Binary logistic regression. The positive class is chosen when the margin
/// `w·x + b` is strictly above `logit(threshold)`, so the default threshold
/// of 0.5 reduces to `margin > 0` and a zero margin is negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            threshold: default_threshold(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn decision_function(&self, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }

    pub fn probability(&self, features: &[f64]) -> f64 {
        1.0 / (1.0 + (-self.decision_function(features)).exp())
    }

    /// Margin the decision function has to exceed.
    pub fn decision_boundary(&self) -> f64 {
        (self.threshold / (1.0 - self.threshold)).ln()
    }

    pub fn is_positive(&self, features: &[f64]) -> bool {
        self.decision_function(features) > self.decision_boundary()
    }

    pub(crate) fn validate(&self, n_features_in: usize) -> Result<(), ModelError> {
        if self.coefficients.len() != n_features_in {
            return Err(ModelError::invalid(format!(
                "logistic regression has {} coefficients but n_features_in is {}",
                self.coefficients.len(),
                n_features_in
            )));
        }
        if self.coefficients.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err(ModelError::invalid(
                "logistic regression parameters must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ModelError::invalid(format!(
                "logistic regression threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}
