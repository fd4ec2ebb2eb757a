use crate::provider::check_feature_layout;
use crate::{
    encode, Application, EligibilityError, FeatureVector, ModelProvider, RawApplication, Verdict,
    FEATURE_COUNT,
};

/// Outcome of one prediction, with the vector the classifier actually saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub class_label: u8,
    pub features: FeatureVector,
}

/// Encode-and-predict over an injected [`ModelProvider`].
///
/// Holds no per-request state: every call validates, encodes and classifies
/// one application independently.
#[derive(Debug)]
pub struct EligibilityPredictor {
    provider: ModelProvider,
}

impl EligibilityPredictor {
    pub fn new(provider: ModelProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    pub fn predict(&self, application: &Application) -> Result<Verdict, EligibilityError> {
        self.predict_detailed(application)
            .map(|prediction| prediction.verdict)
    }

    /// Parses form answers, then predicts. An unavailable model is reported
    /// before the answers are looked at.
    pub fn predict_raw(&self, raw: &RawApplication) -> Result<Prediction, EligibilityError> {
        self.provider.classifier()?;
        let application = raw.parse()?;
        self.predict_detailed(&application)
    }

    pub fn predict_detailed(
        &self,
        application: &Application,
    ) -> Result<Prediction, EligibilityError> {
        let classifier = self.provider.classifier()?;
        check_feature_layout(classifier.n_features_in(), None)?;
        application.validate()?;

        let features = encode(application);
        tracing::debug!(
            target: "loanwise_eligibility",
            input_rows = 1,
            input_cols = FEATURE_COUNT,
            model_expects = classifier.n_features_in(),
            "encoded application"
        );

        let class_label = classifier
            .predict(features.as_slice())
            .map_err(EligibilityError::PredictionFailed)?;
        tracing::debug!(target: "loanwise_eligibility", class_label, "classifier output");

        let verdict = Verdict::from_class(class_label)?;
        tracing::info!(target: "loanwise_eligibility", verdict = %verdict, "prediction complete");

        Ok(Prediction {
            verdict,
            class_label,
            features,
        })
    }
}
