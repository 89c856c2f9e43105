//! Mortgage eligibility evaluation.
//!
//! Takes the applicant's income, obligations and target property, and returns
//! the approvable loan, its payments and a risk classification. The
//! loan-to-value is adjusted exactly once from the trial ratio at the base
//! loan-to-value; the ratio is then recomputed for the final status but never
//! fed back into another adjustment.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::amortization::{interest_only_payment, level_payment, monthly_rate, repayment_months};
use super::rules::{self, RiskStatus};
use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::EvalResult;

/// Ceiling on any monetary input; keeps every sum and product the
/// evaluation forms inside Decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Ceiling on the nominal annual rate, in percent.
pub const MAX_INTEREST_RATE: Percent = dec!(1000);

pub const MAX_LOAN_TERM_YEARS: Years = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Validated figures for one evaluation, in base currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Borrower monthly income.
    pub monthly_income: Money,
    /// Borrower's other recurring monthly obligations.
    pub monthly_expenses: Money,
    /// Total property price.
    pub house_price: Money,
    /// Nominal annual interest rate in percent (e.g., 2.185).
    pub interest_rate: Percent,
    pub loan_term_years: Years,
    /// Interest-only period at the start of the term.
    pub grace_period_years: Years,
    /// Borrower already holds a mortgage.
    pub is_second_home: bool,
    #[serde(default)]
    pub guarantor_income: Money,
    #[serde(default)]
    pub guarantor_expenses: Money,
}

impl MortgageInput {
    /// Fold a co-signer's monthly income and obligations into the evaluation.
    pub fn with_guarantor(mut self, income: Money, expenses: Money) -> Self {
        self.guarantor_income = income;
        self.guarantor_expenses = expenses;
        self
    }

    /// Reject figures outside the domain the underwriting rules are defined on.
    pub fn validate(&self) -> EvalResult<()> {
        let amounts = [
            ("monthly_income", self.monthly_income),
            ("monthly_expenses", self.monthly_expenses),
            ("house_price", self.house_price),
            ("guarantor_income", self.guarantor_income),
            ("guarantor_expenses", self.guarantor_expenses),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(MortgageError::InvalidInput {
                    field: field.into(),
                    reason: "Value cannot be negative.".into(),
                });
            }
            if value > MAX_AMOUNT {
                return Err(MortgageError::InvalidInput {
                    field: field.into(),
                    reason: format!("Value cannot exceed {MAX_AMOUNT}."),
                });
            }
        }
        if self.house_price.is_zero() {
            return Err(MortgageError::InvalidInput {
                field: "house_price".into(),
                reason: "House price must be positive.".into(),
            });
        }
        if self.interest_rate < Decimal::ZERO || self.interest_rate > MAX_INTEREST_RATE {
            return Err(MortgageError::InvalidInput {
                field: "interest_rate".into(),
                reason: format!("Interest rate must be between 0 and {MAX_INTEREST_RATE}%."),
            });
        }
        if self.loan_term_years <= Decimal::ZERO || self.loan_term_years > MAX_LOAN_TERM_YEARS {
            return Err(MortgageError::InvalidInput {
                field: "loan_term_years".into(),
                reason: format!(
                    "Loan term must be positive and at most {MAX_LOAN_TERM_YEARS} years."
                ),
            });
        }
        if self.grace_period_years < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "grace_period_years".into(),
                reason: "Value cannot be negative.".into(),
            });
        }
        if self.grace_period_years > self.loan_term_years {
            return Err(MortgageError::InvalidInput {
                field: "grace_period_years".into(),
                reason: "Grace period cannot exceed the loan term.".into(),
            });
        }
        // A repayment window shorter than a month would divide by a near-zero count
        for (field, years) in [
            ("loan_term_years", self.loan_term_years),
            ("grace_period_years", self.grace_period_years),
        ] {
            if !(years * dec!(12)).fract().is_zero() {
                return Err(MortgageError::InvalidInput {
                    field: field.into(),
                    reason: "Must be a whole number of months.".into(),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of one evaluation.
///
/// Payments, debt, income and the ratio are rounded to whole units; the loan
/// amount and loan-to-value are exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub max_loan_amount: Money,
    /// Final loan-to-value (0.8 = 80%).
    pub loan_percentage: Rate,
    /// Principal-and-interest payment after any grace period.
    pub monthly_payment: Money,
    /// Interest-only payment during the grace period.
    pub monthly_payment_grace: Money,
    /// Total income / total monthly debt in percent; `None` when there is no debt.
    pub income_expense_ratio: Option<Decimal>,
    pub total_monthly_debt: Money,
    pub total_monthly_income: Money,
    /// Income that would bring the final debt to a 160% ratio.
    pub required_income: Money,
    pub status: RiskStatus,
    /// Explanation of each rule applied, in order.
    pub messages: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate mortgage eligibility for one applicant (plus optional guarantor).
pub fn evaluate(input: &MortgageInput) -> EvalResult<ComputationOutput<MortgageResult>> {
    let start = Instant::now();
    input.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let result = compute(input, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Income/debt ratio underwriting with single-pass loan-to-value adjustment",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Income / debt in percent. `None` when there is no debt, or the quotient
/// exceeds what a Decimal can hold.
pub fn income_ratio(total_income: Money, total_debt: Money) -> Option<Decimal> {
    if total_debt.is_zero() {
        return None;
    }
    total_income
        .checked_div(total_debt)
        .and_then(|q| q.checked_mul(dec!(100)))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn compute(input: &MortgageInput, warnings: &mut Vec<String>) -> EvalResult<MortgageResult> {
    let total_income = input.monthly_income + input.guarantor_income;
    let total_other_expenses = input.monthly_expenses + input.guarantor_expenses;

    let (base_percentage, base_message) = rules::base_percentage(input.is_second_home);
    let mut messages = vec![base_message.to_string()];

    let rate = monthly_rate(input.interest_rate);
    let months = repayment_months(input.loan_term_years, input.grace_period_years);
    if months <= Decimal::ZERO {
        warn!(
            loan_term_years = %input.loan_term_years,
            grace_period_years = %input.grace_period_years,
            "grace period covers the whole term"
        );
        warnings.push(
            "Grace period covers the whole loan term; amortized monthly payment is zero".into(),
        );
    }

    // Trial at the base loan-to-value
    let trial_payment = level_payment(input.house_price * base_percentage, rate, months)?;
    let trial_ratio = income_ratio(total_income, trial_payment + total_other_expenses);
    let band = rules::adjustment_band(trial_ratio);
    debug!(
        trial_payment = %trial_payment,
        trial_ratio = ?trial_ratio,
        reduction = %band.reduction,
        "loan-to-value band selected"
    );
    messages.push(band.message(input.is_second_home).to_string());

    if input.guarantor_income > Decimal::ZERO {
        messages.push(rules::guarantor_message(
            input.guarantor_income,
            input.guarantor_expenses,
        ));
        if input.monthly_income.is_zero() {
            messages.push(rules::GUARANTOR_ONLY_MESSAGE.to_string());
        }
    }

    let loan_percentage = (base_percentage - band.reduction).max(Decimal::ZERO);
    let max_loan_amount = input.house_price * loan_percentage;
    let monthly_payment = level_payment(max_loan_amount, rate, months)?;
    let monthly_payment_grace = interest_only_payment(max_loan_amount, rate);

    let total_monthly_debt = monthly_payment + total_other_expenses;
    let ratio = income_ratio(total_income, total_monthly_debt);
    if ratio.is_none() {
        warnings.push("No monthly debt; income/debt ratio is unbounded".into());
    }
    let status = rules::status_for(ratio);
    debug!(final_ratio = ?ratio, status = %status, "risk status assigned");

    let required_income = total_monthly_debt * rules::REQUIRED_INCOME_MULTIPLIER;

    Ok(MortgageResult {
        max_loan_amount,
        loan_percentage,
        monthly_payment: round_whole(monthly_payment),
        monthly_payment_grace: round_whole(monthly_payment_grace),
        income_expense_ratio: ratio.map(round_whole),
        total_monthly_debt: round_whole(total_monthly_debt),
        total_monthly_income: round_whole(total_income),
        required_income: round_whole(required_income),
        status,
        messages,
    })
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
