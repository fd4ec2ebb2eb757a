use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact {origin} is corrupt: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("ONNX model {origin} could not be loaded: {reason}")]
    Onnx { origin: String, reason: String },
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Keeps the whole cause chain of a tract error as text.
    pub(crate) fn onnx(origin: &str, error: impl fmt::Display) -> Self {
        Self::Onnx {
            origin: origin.to_string(),
            reason: format!("{error:#}"),
        }
    }

    pub(crate) fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }
}
