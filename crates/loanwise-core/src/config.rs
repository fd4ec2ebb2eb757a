use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "loanwise.toml";
pub const DEFAULT_MODEL_PATH: &str = "models/loan_model.onnx";
pub const DEFAULT_LOG_FILTER: &str = "loanwise=info,loanwise_eligibility=info,loanwise_model=info";
pub const LOG_ENV: &str = "LOANWISE_LOG";

/// Contents of `loanwise.toml`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model_path: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl FileConfig {
    pub fn parse(source: &str, origin: &Path) -> Result<Self> {
        toml::from_str(source)
            .with_context(|| format!("invalid config file {}", origin.display()))
    }

    /// A relative `model_path` is taken relative to the config file's
    /// directory.
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&source, path)?;
        if let (Some(model_path), Some(dir)) = (config.model_path.as_mut(), path.parent()) {
            if model_path.is_relative() {
                *model_path = dir.join(&*model_path);
            }
        }
        Ok(config)
    }

    /// An explicit path must exist; the fallback file is optional.
    pub fn discover(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None if fallback.is_file() => Self::read(fallback),
            None => Ok(Self::default()),
        }
    }
}

/// Effective settings after merging flags, environment and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// `model_flag` already folds in `LOANWISE_MODEL_PATH` through clap, so
    /// the order is flag, then env, then file, then default.
    pub fn resolve(model_flag: Option<PathBuf>, log_env: Option<String>, file: FileConfig) -> Self {
        let model_path = model_flag
            .or(file.model_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
        let log_filter = log_env
            .filter(|filter| !filter.trim().is_empty())
            .or(file.log_filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            model_path,
            log_filter,
        }
    }
}
