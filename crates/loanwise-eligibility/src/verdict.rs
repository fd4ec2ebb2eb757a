use std::fmt;

use loanwise_model::ModelError;

use crate::EligibilityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Eligible,
    NotEligible,
}

impl Verdict {
    /// Maps the classifier's label: 1 is eligible, 0 is not.
    pub fn from_class(label: u8) -> Result<Self, EligibilityError> {
        match label {
            0 => Ok(Verdict::NotEligible),
            1 => Ok(Verdict::Eligible),
            other => Err(EligibilityError::PredictionFailed(ModelError::Inference(
                format!("classifier returned unexpected class {other}"),
            ))),
        }
    }

    pub fn is_eligible(self) -> bool {
        matches!(self, Verdict::Eligible)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Eligible => "Eligible",
            Verdict::NotEligible => "Not Eligible",
        };
        f.write_str(label)
    }
}
