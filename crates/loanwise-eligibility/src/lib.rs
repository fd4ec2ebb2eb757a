pub mod application;
pub mod encode;
pub mod error;
pub mod predictor;
pub mod provider;
pub mod verdict;

pub use application::{
    check_credit_history, check_loan_term, check_non_negative, Application, Dependents,
    Education, FormChoice, Gender, MaritalStatus, PropertyArea, RawApplication, SelfEmployed,
};
pub use encode::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use error::EligibilityError;
pub use predictor::{EligibilityPredictor, Prediction};
pub use provider::{ModelInfo, ModelProvider};
pub use verdict::Verdict;
