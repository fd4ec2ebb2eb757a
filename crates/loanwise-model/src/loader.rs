use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::digest::sha256_hex;
use crate::{Classifier, ModelArtifact, ModelError, OnnxClassifier, TrainedModel};

/// Artifact encodings the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// An ONNX graph; the default for anything not ending in `.json`.
    Onnx,
    /// A [`ModelArtifact`] document.
    Json,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Onnx,
        }
    }
}

/// A trained model together with what is known about the file it came from.
pub struct LoadedModel {
    pub model: Box<dyn Classifier>,
    pub format: ArtifactFormat,
    pub path: PathBuf,
    /// Hex SHA-256 of the artifact bytes.
    pub digest: String,
    pub feature_names: Option<Vec<String>>,
    pub description: Option<String>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("kind", &self.model.kind())
            .field("format", &self.format)
            .field("path", &self.path)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedModel, ModelError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ModelError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ModelError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_bytes(&bytes, path)
    }

    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<LoadedModel, ModelError> {
        let digest = sha256_hex(bytes);
        let origin = path.display().to_string();
        let format = ArtifactFormat::from_path(path);

        let (model, feature_names, description): (Box<dyn Classifier>, _, _) = match format {
            ArtifactFormat::Onnx => {
                let model = OnnxClassifier::from_bytes(bytes, &origin)?;
                let description = model.description().map(str::to_string);
                (Box::new(model), None, description)
            }
            ArtifactFormat::Json => {
                let artifact = ModelArtifact::from_slice(bytes, &origin)?;
                let feature_names = artifact.feature_names.clone();
                let description = artifact.description.clone();
                (Box::new(TrainedModel::try_from(artifact)?), feature_names, description)
            }
        };

        tracing::info!(
            target: "loanwise_model",
            path = %path.display(),
            format = ?format,
            kind = model.kind(),
            n_features_in = model.n_features_in(),
            digest = %digest,
            "model artifact loaded"
        );

        Ok(LoadedModel {
            model,
            format,
            path: path.to_path_buf(),
            digest,
            feature_names,
            description,
        })
    }
}
