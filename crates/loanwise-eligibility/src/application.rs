use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EligibilityError;

/// A categorical form field with a closed set of labelled options.
pub trait FormChoice: Sized + Copy + 'static {
    /// Key used in application files and error messages.
    const FIELD: &'static str;
    /// Title shown next to the field in the form.
    const PROMPT: &'static str;
    /// Options in the order the form presents them.
    const OPTIONS: &'static [Self];

    /// Canonical label, as offered by the form.
    fn label(self) -> &'static str;

    /// Matches an already trimmed, lowercased label.
    fn from_normalized(label: &str) -> Option<Self>;

    fn parse_label(raw: &str) -> Result<Self, EligibilityError> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::from_normalized(&normalized).ok_or_else(|| {
            let options: Vec<&str> = Self::OPTIONS.iter().map(|option| option.label()).collect();
            EligibilityError::invalid(
                Self::FIELD,
                format!("{raw:?} is not one of {}", options.join(", ")),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl FormChoice for Gender {
    const FIELD: &'static str = "gender";
    const PROMPT: &'static str = "Gender";
    const OPTIONS: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaritalStatus {
    Married,
    Unmarried,
}

impl FormChoice for MaritalStatus {
    const FIELD: &'static str = "married";
    const PROMPT: &'static str = "Married";
    const OPTIONS: &'static [Self] = &[MaritalStatus::Married, MaritalStatus::Unmarried];

    fn label(self) -> &'static str {
        match self {
            MaritalStatus::Married => "Yes",
            MaritalStatus::Unmarried => "No",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "yes" | "married" => Some(MaritalStatus::Married),
            "no" | "unmarried" => Some(MaritalStatus::Unmarried),
            _ => None,
        }
    }
}

/// Number of dependents; `ThreeOrMore` covers every household above two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependents {
    Zero,
    One,
    Two,
    ThreeOrMore,
}

impl FormChoice for Dependents {
    const FIELD: &'static str = "dependents";
    const PROMPT: &'static str = "Dependents";
    const OPTIONS: &'static [Self] = &[
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreeOrMore,
    ];

    fn label(self) -> &'static str {
        match self {
            Dependents::Zero => "None",
            Dependents::One => "One",
            Dependents::Two => "Two",
            Dependents::ThreeOrMore => "Three",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "none" | "0" => Some(Dependents::Zero),
            "one" | "1" => Some(Dependents::One),
            "two" | "2" => Some(Dependents::Two),
            "three" | "3" | "3+" | "3 or more" => Some(Dependents::ThreeOrMore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Education {
    Graduate,
    NotGraduate,
}

impl FormChoice for Education {
    const FIELD: &'static str = "education";
    const PROMPT: &'static str = "Education";
    const OPTIONS: &'static [Self] = &[Education::Graduate, Education::NotGraduate];

    fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "graduate" => Some(Education::Graduate),
            "not graduate" | "notgraduate" => Some(Education::NotGraduate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelfEmployed {
    Yes,
    No,
}

impl FormChoice for SelfEmployed {
    const FIELD: &'static str = "self_employed";
    const PROMPT: &'static str = "Self-Employed";
    const OPTIONS: &'static [Self] = &[SelfEmployed::Yes, SelfEmployed::No];

    fn label(self) -> &'static str {
        match self {
            SelfEmployed::Yes => "Yes",
            SelfEmployed::No => "No",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "yes" => Some(SelfEmployed::Yes),
            "no" => Some(SelfEmployed::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyArea {
    Semiurban,
    Urban,
    Rural,
}

impl FormChoice for PropertyArea {
    const FIELD: &'static str = "property_area";
    const PROMPT: &'static str = "Property Area";
    const OPTIONS: &'static [Self] = &[
        PropertyArea::Semiurban,
        PropertyArea::Urban,
        PropertyArea::Rural,
    ];

    fn label(self) -> &'static str {
        match self {
            PropertyArea::Semiurban => "Semiurban",
            PropertyArea::Urban => "Urban",
            PropertyArea::Rural => "Rural",
        }
    }

    fn from_normalized(label: &str) -> Option<Self> {
        match label {
            "semiurban" => Some(PropertyArea::Semiurban),
            "urban" => Some(PropertyArea::Urban),
            "rural" => Some(PropertyArea::Rural),
            _ => None,
        }
    }
}

macro_rules! form_choice_traits {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = EligibilityError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::parse_label(s)
                }
            }
        )+
    };
}

form_choice_traits!(
    Gender,
    MaritalStatus,
    Dependents,
    Education,
    SelfEmployed,
    PropertyArea,
);

/// One validated loan application. Amounts are in currency units; scaling for
/// the model happens in [`crate::encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: u32,
    pub credit_history: f64,
    pub property_area: PropertyArea,
}

impl Application {
    /// Re-checks the numeric domains. Enumerated fields are valid by construction.
    pub fn validate(&self) -> Result<(), EligibilityError> {
        check_non_negative("applicant_income", self.applicant_income)?;
        check_non_negative("coapplicant_income", self.coapplicant_income)?;
        check_non_negative("loan_amount", self.loan_amount)?;
        if self.loan_term_months == 0 {
            return Err(EligibilityError::invalid(
                "loan_term_months",
                "must be at least 1 month",
            ));
        }
        check_credit_history(self.credit_history)?;
        Ok(())
    }
}

/// The eleven answers as a form or application file supplies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawApplication {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: f64,
    pub credit_history: f64,
    pub property_area: String,
}

impl RawApplication {
    pub fn parse(&self) -> Result<Application, EligibilityError> {
        let application = Application {
            gender: self.gender.parse()?,
            marital_status: self.married.parse()?,
            dependents: self.dependents.parse()?,
            education: self.education.parse()?,
            self_employed: self.self_employed.parse()?,
            applicant_income: check_non_negative("applicant_income", self.applicant_income)?,
            coapplicant_income: check_non_negative("coapplicant_income", self.coapplicant_income)?,
            loan_amount: check_non_negative("loan_amount", self.loan_amount)?,
            loan_term_months: check_loan_term(self.loan_term_months)?,
            credit_history: check_credit_history(self.credit_history)?,
            property_area: self.property_area.parse()?,
        };
        Ok(application)
    }
}

impl TryFrom<RawApplication> for Application {
    type Error = EligibilityError;

    fn try_from(raw: RawApplication) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<&Application> for RawApplication {
    fn from(application: &Application) -> Self {
        Self {
            gender: application.gender.to_string(),
            married: application.marital_status.to_string(),
            dependents: application.dependents.to_string(),
            education: application.education.to_string(),
            self_employed: application.self_employed.to_string(),
            applicant_income: application.applicant_income,
            coapplicant_income: application.coapplicant_income,
            loan_amount: application.loan_amount,
            loan_term_months: f64::from(application.loan_term_months),
            credit_history: application.credit_history,
            property_area: application.property_area.to_string(),
        }
    }
}

pub fn check_non_negative(field: &'static str, value: f64) -> Result<f64, EligibilityError> {
    if !value.is_finite() {
        return Err(EligibilityError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(EligibilityError::invalid(
            field,
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(value)
}

pub fn check_loan_term(value: f64) -> Result<u32, EligibilityError> {
    const FIELD: &str = "loan_term_months";
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(EligibilityError::invalid(
            FIELD,
            format!("must be a whole number of months (got {value})"),
        ));
    }
    if value < 1.0 {
        return Err(EligibilityError::invalid(
            FIELD,
            format!("must be at least 1 month (got {value})"),
        ));
    }
    if value > f64::from(u32::MAX) {
        return Err(EligibilityError::invalid(
            FIELD,
            format!("{value} months is out of range"),
        ));
    }
    Ok(value as u32)
}

pub fn check_credit_history(value: f64) -> Result<f64, EligibilityError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EligibilityError::invalid(
            "credit_history",
            format!("must be between 0 and 1 (got {value})"),
        ));
    }
    Ok(value)
}
