use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_eligibility_core::application::intake::{self, MortgageApplication};
use mortgage_eligibility_core::eligibility::evaluator::{self, MortgageInput};

use crate::input;

/// Arguments for a direct evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Borrower monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Borrower's other recurring monthly obligations
    #[arg(long, default_value = "0")]
    pub monthly_expenses: Decimal,

    /// Total house price in currency units
    #[arg(long)]
    pub house_price: Option<Decimal>,

    /// Nominal annual interest rate in percent
    #[arg(long, default_value = "2.185")]
    pub interest_rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term_years: Decimal,

    /// Interest-only grace period in years
    #[arg(long, default_value = "0")]
    pub grace_period_years: Decimal,

    /// Borrower already holds a mortgage
    #[arg(long)]
    pub second_home: bool,

    /// Guarantor monthly income
    #[arg(long, default_value = "0")]
    pub guarantor_income: Decimal,

    /// Guarantor's recurring monthly obligations
    #[arg(long, default_value = "0")]
    pub guarantor_expenses: Decimal,
}

/// Arguments for evaluating a form-unit application
#[derive(Args)]
pub struct ApplyArgs {
    /// Path to a JSON or YAML application file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(from_stdin) = input::stdin::read_stdin::<MortgageInput>()? {
        from_stdin
    } else {
        MortgageInput {
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_expenses: args.monthly_expenses,
            house_price: args
                .house_price
                .ok_or("--house-price is required (or provide --input)")?,
            interest_rate: args.interest_rate,
            loan_term_years: args.loan_term_years,
            grace_period_years: args.grace_period_years,
            is_second_home: args.second_home,
            guarantor_income: args.guarantor_income,
            guarantor_expenses: args.guarantor_expenses,
        }
    };

    let result = evaluator::evaluate(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_apply(args: ApplyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: MortgageApplication = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(from_stdin) = input::stdin::read_stdin::<MortgageApplication>()? {
        from_stdin
    } else {
        return Err("--input <file> or stdin required for an application".into());
    };

    let result = intake::evaluate_application(&application)?;
    Ok(serde_json::to_value(result)?)
}
