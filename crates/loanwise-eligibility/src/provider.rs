use std::fmt;
use std::path::{Path, PathBuf};

use loanwise_model::{Classifier, ModelLoader};

use crate::{EligibilityError, FEATURE_COUNT, FEATURE_NAMES};

/// What the provider knows about the classifier it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Artifact location; `None` for classifiers handed in directly.
    pub path: Option<PathBuf>,
    pub kind: &'static str,
    pub n_features_in: usize,
    pub digest: Option<String>,
    pub description: Option<String>,
}

/// The process-wide classifier, loaded once at startup.
///
/// A provider that failed to load stays `Unavailable` for the lifetime of the
/// process; predictions against it report the original reason.
pub enum ModelProvider {
    Ready {
        classifier: Box<dyn Classifier>,
        info: ModelInfo,
    },
    Unavailable {
        reason: String,
    },
}

impl ModelProvider {
    /// Loads an artifact and checks that its layout and class labels match
    /// what the encoder and verdict mapping expect.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EligibilityError> {
        let loaded = ModelLoader::load(path).map_err(EligibilityError::ModelLoadFailed)?;
        check_feature_layout(loaded.model.n_features_in(), loaded.feature_names.as_deref())?;
        check_class_labels(loaded.model.classes())?;

        let info = ModelInfo {
            path: Some(loaded.path),
            kind: loaded.model.kind(),
            n_features_in: loaded.model.n_features_in(),
            digest: Some(loaded.digest),
            description: loaded.description,
        };
        Ok(Self::Ready {
            classifier: loaded.model,
            info,
        })
    }

    /// Like [`ModelProvider::load`], but a failure is logged once and turned
    /// into an unavailable provider instead of an error.
    pub fn load_or_unavailable<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(provider) => provider,
            Err(error) => {
                tracing::error!(
                    target: "loanwise_eligibility",
                    path = %path.display(),
                    error = %error,
                    "model unavailable; predictions are disabled"
                );
                Self::unavailable(error.to_string())
            }
        }
    }

    pub fn from_classifier(classifier: Box<dyn Classifier>) -> Result<Self, EligibilityError> {
        check_feature_layout(classifier.n_features_in(), None)?;
        check_class_labels(classifier.classes())?;
        let info = ModelInfo {
            path: None,
            kind: classifier.kind(),
            n_features_in: classifier.n_features_in(),
            digest: None,
            description: None,
        };
        Ok(Self::Ready { classifier, info })
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn info(&self) -> Option<&ModelInfo> {
        match self {
            Self::Ready { info, .. } => Some(info),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Self::Ready { .. } => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }

    pub fn classifier(&self) -> Result<&dyn Classifier, EligibilityError> {
        match self {
            Self::Ready { classifier, .. } => Ok(classifier.as_ref()),
            Self::Unavailable { reason } => Err(EligibilityError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}

impl fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready { info, .. } => f.debug_struct("Ready").field("info", info).finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

pub(crate) fn check_feature_layout(
    n_features_in: usize,
    feature_names: Option<&[String]>,
) -> Result<(), EligibilityError> {
    if n_features_in != FEATURE_COUNT {
        return Err(EligibilityError::FeatureCountMismatch {
            model: n_features_in,
            encoder: FEATURE_COUNT,
        });
    }
    if let Some(names) = feature_names {
        if names.len() != FEATURE_COUNT {
            return Err(EligibilityError::FeatureCountMismatch {
                model: names.len(),
                encoder: FEATURE_COUNT,
            });
        }
        if names.iter().zip(FEATURE_NAMES).any(|(model, encoder)| model != encoder) {
            return Err(EligibilityError::FeatureOrderMismatch {
                model: names.to_vec(),
                encoder: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            });
        }
    }
    Ok(())
}

/// Labels a model declares must be exactly `{0, 1}`, in either order.
/// Models that declare none are checked per prediction instead.
pub(crate) fn check_class_labels(classes: Option<Vec<i64>>) -> Result<(), EligibilityError> {
    let Some(classes) = classes else {
        return Ok(());
    };
    let mut sorted = classes.clone();
    sorted.sort_unstable();
    if sorted != [0, 1] {
        return Err(EligibilityError::UnsupportedClasses { classes });
    }
    Ok(())
}
