use std::io::{BufRead, Write};

use anyhow::Result;
use loanwise_eligibility::{
    check_credit_history, check_loan_term, check_non_negative, Dependents, Education,
    EligibilityError, EligibilityPredictor, FormChoice, Gender, MaritalStatus, PropertyArea,
    RawApplication, SelfEmployed,
};

use crate::report;

/// Terminal rendition of the application form.
///
/// Every question has a default that an empty answer accepts: the first option
/// for choices, the lower bound for numbers. Invalid answers are reported and
/// asked again. End of input abandons the current application.
pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Collects and predicts applications until the user stops or input ends.
    /// Returns how many applications were submitted.
    pub fn run(&mut self, predictor: &EligibilityPredictor) -> Result<usize> {
        writeln!(self.output, "Loan Eligibility Prediction")?;
        writeln!(
            self.output,
            "Use this app to predict loan eligibility based on applicant details."
        )?;
        writeln!(self.output, "{}", report::startup_banner(predictor.provider()))?;

        let mut submitted = 0;
        while let Some(raw) = self.collect()? {
            submitted += 1;
            match predictor.predict_raw(&raw) {
                Ok(prediction) => {
                    writeln!(self.output, "{}", report::verdict_message(prediction.verdict))?
                }
                Err(error) => {
                    tracing::warn!(error = %error, "no verdict for submitted application");
                    writeln!(self.output, "{}", report::error_message(&error))?;
                }
            }
            if !self.confirm("Predict another application?")? {
                break;
            }
        }
        Ok(submitted)
    }

    /// Asks the eleven questions in form order. `None` means input ended.
    pub fn collect(&mut self) -> Result<Option<RawApplication>> {
        let Some(gender) = self.choose::<Gender>()? else {
            return Ok(None);
        };
        let Some(married) = self.choose::<MaritalStatus>()? else {
            return Ok(None);
        };
        let Some(dependents) = self.choose::<Dependents>()? else {
            return Ok(None);
        };
        let Some(education) = self.choose::<Education>()? else {
            return Ok(None);
        };
        let Some(self_employed) = self.choose::<SelfEmployed>()? else {
            return Ok(None);
        };
        let Some(applicant_income) = self.number("Applicant Income", 0.0, |value| {
            check_non_negative("applicant_income", value)
        })?
        else {
            return Ok(None);
        };
        let Some(coapplicant_income) = self.number("Coapplicant Income", 0.0, |value| {
            check_non_negative("coapplicant_income", value)
        })?
        else {
            return Ok(None);
        };
        let Some(loan_amount) = self.number("Loan Amount", 0.0, |value| {
            check_non_negative("loan_amount", value)
        })?
        else {
            return Ok(None);
        };
        let Some(loan_term_months) = self.number("Loan Tenor (in months)", 1.0, |value| {
            check_loan_term(value).map(f64::from)
        })?
        else {
            return Ok(None);
        };
        let Some(credit_history) = self.number("Credit History", 0.0, check_credit_history)?
        else {
            return Ok(None);
        };
        let Some(property_area) = self.choose::<PropertyArea>()? else {
            return Ok(None);
        };

        Ok(Some(RawApplication {
            gender: gender.label().to_string(),
            married: married.label().to_string(),
            dependents: dependents.label().to_string(),
            education: education.label().to_string(),
            self_employed: self_employed.label().to_string(),
            applicant_income,
            coapplicant_income,
            loan_amount,
            loan_term_months,
            credit_history,
            property_area: property_area.label().to_string(),
        }))
    }

    fn choose<T: FormChoice>(&mut self) -> Result<Option<T>> {
        let labels: Vec<&str> = T::OPTIONS.iter().map(|option| option.label()).collect();
        let default = T::OPTIONS[0];
        loop {
            write!(
                self.output,
                "{} [{}] (default {}): ",
                T::PROMPT,
                labels.join(" / "),
                default.label()
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match T::parse_label(answer) {
                Ok(choice) => return Ok(Some(choice)),
                Err(error) => writeln!(self.output, "{}", report::error_message(&error))?,
            }
        }
    }

    fn number<F>(&mut self, prompt: &str, default: f64, check: F) -> Result<Option<f64>>
    where
        F: Fn(f64) -> Result<f64, EligibilityError>,
    {
        loop {
            write!(self.output, "{prompt} (default {default}): ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<f64>() {
                Ok(value) => match check(value) {
                    Ok(value) => return Ok(Some(value)),
                    Err(error) => writeln!(self.output, "{}", report::error_message(&error))?,
                },
                Err(_) => writeln!(self.output, "Invalid input: {answer:?} is not a number")?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
