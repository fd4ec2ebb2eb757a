use crate::ModelError;

/// A trained binary classifier that consumes one feature vector per call.
///
/// Implementations are read-only after construction so a single instance can
/// serve every request for the lifetime of the process.
pub trait Classifier: Send + Sync {
    /// Short identifier of the estimator family, e.g. `"logistic_regression"`.
    fn kind(&self) -> &'static str;

    /// Number of features the classifier was fit on.
    fn n_features_in(&self) -> usize;

    /// Class labels the model can emit, when the artifact declares them.
    fn classes(&self) -> Option<Vec<i64>> {
        None
    }

    /// Returns the predicted class label for a single sample.
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError>;
}

/// Rejects samples whose shape or values the estimators cannot score.
pub(crate) fn check_sample(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::inference(format!(
            "sample has {} features, model expects {}",
            features.len(),
            expected
        )));
    }
    if let Some(index) = features.iter().position(|value| !value.is_finite()) {
        return Err(ModelError::inference(format!(
            "feature {index} is not a finite number ({})",
            features[index]
        )));
    }
    Ok(())
}
