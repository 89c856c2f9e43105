//! Application intake: form-level figures to evaluator input.
//!
//! Applicants quote the house price in ten-thousands (萬) and split their
//! obligations into existing loan payments and living expenses. This module
//! parses raw form fields, applies the form defaults, and converts everything
//! to base currency units for [`evaluate`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::eligibility::evaluator::{evaluate, MortgageInput, MortgageResult};
use crate::error::MortgageError;
use crate::types::{ComputationOutput, Money, Percent, Years};
use crate::EvalResult;

/// Currency units per 萬.
const TEN_THOUSAND: Decimal = dec!(10_000);

pub const DEFAULT_INTEREST_RATE: Percent = dec!(2.185);
pub const DEFAULT_LOAN_TERM_YEARS: Years = dec!(30);

fn default_interest_rate() -> Percent {
    DEFAULT_INTEREST_RATE
}

fn default_loan_term_years() -> Years {
    DEFAULT_LOAN_TERM_YEARS
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Co-signer figures as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuarantorDetails {
    pub monthly_income: Money,
    #[serde(default)]
    pub existing_loan_payment: Money,
    #[serde(default)]
    pub living_expenses: Money,
}

/// A mortgage application in the units the applicant enters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageApplication {
    pub monthly_income: Money,
    /// Monthly payments on loans already held (credit, car, ...).
    #[serde(default)]
    pub existing_loan_payment: Money,
    #[serde(default)]
    pub living_expenses: Money,
    /// House price in ten-thousands (萬); 1000 means 10,000,000.
    pub house_price_wan: Decimal,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Percent,
    #[serde(default = "default_loan_term_years")]
    pub loan_term_years: Years,
    #[serde(default)]
    pub grace_period_years: Years,
    /// Applicant already holds a mortgage.
    #[serde(default)]
    pub has_other_mortgage: bool,
    #[serde(default)]
    pub guarantor: Option<GuarantorDetails>,
}

impl MortgageApplication {
    /// Convert to base currency units with obligations aggregated per party.
    ///
    /// Fails when a sum or the 萬 conversion leaves Decimal range.
    pub fn to_input(&self) -> EvalResult<MortgageInput> {
        let (guarantor_income, guarantor_expenses) = match &self.guarantor {
            Some(g) => (
                g.monthly_income,
                checked_sum(
                    "guarantor_expenses",
                    g.existing_loan_payment,
                    g.living_expenses,
                )?,
            ),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let house_price = self
            .house_price_wan
            .checked_mul(TEN_THOUSAND)
            .ok_or_else(|| out_of_range("house_price_wan"))?;

        Ok(MortgageInput {
            monthly_income: self.monthly_income,
            monthly_expenses: checked_sum(
                "monthly_expenses",
                self.existing_loan_payment,
                self.living_expenses,
            )?,
            house_price,
            interest_rate: self.interest_rate,
            loan_term_years: self.loan_term_years,
            grace_period_years: self.grace_period_years,
            is_second_home: self.has_other_mortgage,
            guarantor_income,
            guarantor_expenses,
        })
    }

    /// Build an application from raw form fields.
    ///
    /// Recognised keys: `income`, `existing_loan_payment`, `living_expenses`,
    /// `house_price` (萬), `interest_rate`, `loan_term`, `grace_period`,
    /// `has_other_loan`, `has_guarantor`, `guarantor_income`,
    /// `guarantor_existing_loan`, `guarantor_living_expenses`.
    ///
    /// `income` and `house_price` are required. Optional amounts that are
    /// empty or unparsable count as zero. Rate, term and grace fall back to
    /// the form defaults when empty but must parse when present. Thousands
    /// separators are accepted.
    pub fn from_form(fields: &HashMap<String, String>) -> EvalResult<Self> {
        let form = FormFields(fields);

        let guarantor = if form.flag("has_guarantor") {
            Some(GuarantorDetails {
                monthly_income: form.optional_amount("guarantor_income"),
                existing_loan_payment: form.optional_amount("guarantor_existing_loan"),
                living_expenses: form.optional_amount("guarantor_living_expenses"),
            })
        } else {
            None
        };

        Ok(Self {
            monthly_income: form.required("income")?,
            existing_loan_payment: form.optional_amount("existing_loan_payment"),
            living_expenses: form.optional_amount("living_expenses"),
            house_price_wan: form.required("house_price")?,
            interest_rate: form.with_default("interest_rate", DEFAULT_INTEREST_RATE)?,
            loan_term_years: form.with_default("loan_term", DEFAULT_LOAN_TERM_YEARS)?,
            grace_period_years: form.with_default("grace_period", Decimal::ZERO)?,
            has_other_mortgage: form.flag("has_other_loan"),
            guarantor,
        })
    }
}

/// Convert and evaluate an application in one step.
pub fn evaluate_application(
    application: &MortgageApplication,
) -> EvalResult<ComputationOutput<MortgageResult>> {
    evaluate(&application.to_input()?)
}

fn checked_sum(field: &str, a: Money, b: Money) -> EvalResult<Money> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> MortgageError {
    MortgageError::InvalidInput {
        field: field.to_string(),
        reason: "Amount is too large to represent.".into(),
    }
}

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

struct FormFields<'a>(&'a HashMap<String, String>);

impl FormFields<'_> {
    fn raw(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim().replace(',', ""))
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> EvalResult<Decimal> {
        let raw = self
            .raw(key)
            .ok_or_else(|| MortgageError::MissingField(key.to_string()))?;
        parse_number(key, &raw)
    }

    fn with_default(&self, key: &str, default: Decimal) -> EvalResult<Decimal> {
        match self.raw(key) {
            Some(raw) => parse_number(key, &raw),
            None => Ok(default),
        }
    }

    fn optional_amount(&self, key: &str) -> Money {
        self.raw(key)
            .and_then(|raw| Decimal::from_str(&raw).ok())
            .unwrap_or(Decimal::ZERO)
    }

    fn flag(&self, key: &str) -> bool {
        matches!(
            self.raw(key).map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "yes" | "on")
        )
    }
}

fn parse_number(field: &str, raw: &str) -> EvalResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| MortgageError::InvalidInput {
        field: field.to_string(),
        reason: format!("'{raw}' is not a number: {e}"),
    })
}
