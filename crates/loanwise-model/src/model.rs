use crate::classifier::check_sample;
use crate::{Classifier, Estimator, ModelArtifact, ModelError};

/// A validated artifact ready to score samples.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    n_features_in: usize,
    classes: [u8; 2],
    estimator: Estimator,
}

impl TrainedModel {
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }
}

impl TryFrom<ModelArtifact> for TrainedModel {
    type Error = ModelError;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        artifact.validate()?;
        Ok(Self {
            n_features_in: artifact.n_features_in,
            classes: artifact.classes,
            estimator: artifact.estimator,
        })
    }
}

impl Classifier for TrainedModel {
    fn kind(&self) -> &'static str {
        self.estimator.kind()
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn classes(&self) -> Option<Vec<i64>> {
        Some(self.classes.iter().map(|&class| i64::from(class)).collect())
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        check_sample(self.n_features_in, features)?;
        match &self.estimator {
            Estimator::LogisticRegression(model) => {
                Ok(self.classes[usize::from(model.is_positive(features))])
            }
            Estimator::DecisionTree(tree) => tree.evaluate(features),
            Estimator::RandomForest(forest) => forest.vote(features, &self.classes),
        }
    }
}
