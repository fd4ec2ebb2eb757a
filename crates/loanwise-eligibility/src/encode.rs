use crate::{
    Application, Dependents, Education, Gender, MaritalStatus, PropertyArea, SelfEmployed,
};

/// Width of the vector the classifier was trained on.
pub const FEATURE_COUNT: usize = 11;

/// Column order of the training data. The classifier reads features by
/// position, so this order is part of the model contract.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "married",
    "dependents",
    "education",
    "self_employed",
    "applicant_income",
    "coapplicant_income",
    "loan_amount",
    "loan_term_months",
    "credit_history",
    "property_area",
];

const THOUSANDS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Pairs every value with its column name, in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Encodes an application into model order.
///
/// Categorical codes follow the lookup tables the classifier was fit with.
/// `self_employed` maps `Yes` to 0 and `No` to 1; the inversion is part of
/// the trained model and must not be changed here.
pub fn encode(application: &Application) -> FeatureVector {
    FeatureVector([
        gender_code(application.gender),
        marital_code(application.marital_status),
        dependents_code(application.dependents),
        education_code(application.education),
        self_employed_code(application.self_employed),
        application.applicant_income,
        application.coapplicant_income / THOUSANDS,
        application.loan_amount / THOUSANDS,
        f64::from(application.loan_term_months),
        application.credit_history,
        property_area_code(application.property_area),
    ])
}

fn gender_code(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 0.0,
        Gender::Female => 1.0,
    }
}

fn marital_code(status: MaritalStatus) -> f64 {
    match status {
        MaritalStatus::Married => 0.0,
        MaritalStatus::Unmarried => 1.0,
    }
}

fn dependents_code(dependents: Dependents) -> f64 {
    match dependents {
        Dependents::Zero => 0.0,
        Dependents::One => 1.0,
        Dependents::Two => 2.0,
        Dependents::ThreeOrMore => 3.0,
    }
}

fn education_code(education: Education) -> f64 {
    match education {
        Education::Graduate => 0.0,
        Education::NotGraduate => 1.0,
    }
}

fn self_employed_code(self_employed: SelfEmployed) -> f64 {
    match self_employed {
        SelfEmployed::Yes => 0.0,
        SelfEmployed::No => 1.0,
    }
}

fn property_area_code(area: PropertyArea) -> f64 {
    match area {
        PropertyArea::Semiurban => 0.0,
        PropertyArea::Urban => 1.0,
        PropertyArea::Rural => 2.0,
    }
}
