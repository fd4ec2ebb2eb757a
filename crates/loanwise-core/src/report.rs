use std::io::{self, Write};

use loanwise_eligibility::{
    EligibilityError, FeatureVector, ModelProvider, Verdict, FEATURE_COUNT, FEATURE_NAMES,
};

pub const MODEL_LOADED: &str = "Model loaded successfully!";
pub const MODEL_NOT_LOADED: &str = "Model is not loaded. Please check for errors.";

pub fn startup_banner(provider: &ModelProvider) -> String {
    match provider.unavailable_reason() {
        None => MODEL_LOADED.to_string(),
        Some(reason) => format!("Error: {reason}"),
    }
}

pub fn verdict_message(verdict: Verdict) -> String {
    format!("You are {verdict} for the loan.")
}

pub fn error_message(error: &EligibilityError) -> String {
    match error {
        EligibilityError::ModelLoadFailed(_) | EligibilityError::ModelUnavailable { .. } => {
            MODEL_NOT_LOADED.to_string()
        }
        EligibilityError::InvalidInput { .. } => format!("Invalid input: {error}"),
        EligibilityError::FeatureCountMismatch { .. }
        | EligibilityError::FeatureOrderMismatch { .. }
        | EligibilityError::UnsupportedClasses { .. } => {
            format!("Model configuration error: {error}")
        }
        EligibilityError::PredictionFailed(_) => format!("Prediction error: {error}"),
    }
}

pub fn write_features<W: Write>(out: &mut W, features: &FeatureVector) -> io::Result<()> {
    writeln!(out, "Encoded features:")?;
    for (name, value) in features.named() {
        writeln!(out, "  {name:<20} {value}")?;
    }
    Ok(())
}

pub fn write_info<W: Write>(out: &mut W, provider: &ModelProvider) -> io::Result<()> {
    match provider.info() {
        Some(info) => {
            writeln!(out, "status:        ready")?;
            if let Some(path) = &info.path {
                writeln!(out, "path:          {}", path.display())?;
            }
            writeln!(out, "kind:          {}", info.kind)?;
            writeln!(out, "n_features_in: {}", info.n_features_in)?;
            if let Some(digest) = &info.digest {
                writeln!(out, "sha256:        {digest}")?;
            }
            if let Some(description) = &info.description {
                writeln!(out, "description:   {description}")?;
            }
        }
        None => {
            writeln!(out, "status:        unavailable")?;
            if let Some(reason) = provider.unavailable_reason() {
                writeln!(out, "reason:        {reason}")?;
            }
        }
    }
    writeln!(out, "encoder layout ({FEATURE_COUNT} features):")?;
    for (position, name) in FEATURE_NAMES.iter().enumerate() {
        writeln!(out, "  {position:>2} {name}")?;
    }
    Ok(())
}
