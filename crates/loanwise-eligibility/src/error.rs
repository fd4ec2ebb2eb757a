use loanwise_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("failed to load model: {0}")]
    ModelLoadFailed(#[source] ModelError),
    #[error("model is not loaded: {reason}")]
    ModelUnavailable { reason: String },
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("model expects {model} features but the encoder produces {encoder}")]
    FeatureCountMismatch { model: usize, encoder: usize },
    #[error("model feature order {model:?} does not match encoder order {encoder:?}")]
    FeatureOrderMismatch {
        model: Vec<String>,
        encoder: Vec<String>,
    },
    #[error("model predicts classes {classes:?}, expected exactly [0, 1]")]
    UnsupportedClasses { classes: Vec<i64> },
    #[error("prediction failed: {0}")]
    PredictionFailed(#[source] ModelError),
}

impl EligibilityError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
