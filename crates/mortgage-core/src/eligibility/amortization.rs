//! Fixed-rate amortization helpers.
//!
//! The level payment is the standard annuity formula
//! `P * r * (1 + r)^n / ((1 + r)^n - 1)`, evaluated in `rust_decimal::Decimal`
//! with explicit fallbacks for a zero rate and for an empty repayment window.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate, Years};
use crate::EvalResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert a nominal annual rate quoted in percent to a monthly decimal rate.
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Months of principal-and-interest repayment left after the grace period.
///
/// Zero or negative when the grace period covers the whole term.
pub fn repayment_months(loan_term_years: Years, grace_period_years: Years) -> Decimal {
    (loan_term_years - grace_period_years) * MONTHS_PER_YEAR
}

/// Level monthly payment that amortizes `principal` over `months`.
///
/// Returns zero when there are no repayment months, straight-line
/// `principal / months` when the rate is zero, and the interest-only payment
/// once the annuity factor exceeds Decimal range.
pub fn level_payment(principal: Money, monthly_rate: Rate, months: Decimal) -> EvalResult<Money> {
    if months <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if monthly_rate.is_zero() {
        return checked_quotient(principal, months);
    }

    let Some(factor) = (Decimal::ONE + monthly_rate).checked_powd(months) else {
        // Past Decimal range f / (f - 1) is exactly 1 at 28 digits, leaving
        // the interest-only payment.
        return principal.checked_mul(monthly_rate).ok_or_else(|| overflow(principal));
    };
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to move the factor at 28 digits
        return checked_quotient(principal, months);
    }

    (factor / denominator)
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(principal))
        .ok_or_else(|| overflow(principal))
}

fn checked_quotient(principal: Money, months: Decimal) -> EvalResult<Money> {
    principal.checked_div(months).ok_or_else(|| overflow(principal))
}

fn overflow(principal: Money) -> MortgageError {
    MortgageError::FinancialImpossibility(format!(
        "level payment overflows for principal {principal}"
    ))
}

/// Interest-only monthly payment during the grace period.
pub fn interest_only_payment(principal: Money, monthly_rate: Rate) -> Money {
    principal * monthly_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(2.4)), dec!(0.002));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_repayment_months() {
        assert_eq!(repayment_months(dec!(30), dec!(0)), dec!(360));
        assert_eq!(repayment_months(dec!(30), dec!(3)), dec!(324));
        assert_eq!(repayment_months(dec!(20), dec!(20)), Decimal::ZERO);
        assert_eq!(repayment_months(dec!(2.5), dec!(0.5)), dec!(24));
    }

    #[test]
    fn test_level_payment_thirty_year() {
        // 8,000,000 at 2.185% over 360 months ≈ 30,315.14
        let pmt = level_payment(dec!(8_000_000), monthly_rate(dec!(2.185)), dec!(360)).unwrap();
        assert_close(pmt, dec!(30315.14), dec!(0.01), "30y level payment");
    }

    #[test]
    fn test_level_payment_textbook() {
        // 100,000 at 6% over 360 months = 599.55
        let pmt = level_payment(dec!(100_000), dec!(0.005), dec!(360)).unwrap();
        assert_close(pmt, dec!(599.55), dec!(0.01), "textbook 6% mortgage");
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        let pmt = level_payment(dec!(360_000), Decimal::ZERO, dec!(360)).unwrap();
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_level_payment_no_repayment_months() {
        let rate = monthly_rate(dec!(2.185));
        assert_eq!(level_payment(dec!(8_000_000), rate, Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(level_payment(dec!(8_000_000), rate, dec!(-12)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_zero_principal() {
        let pmt = level_payment(Decimal::ZERO, monthly_rate(dec!(2.185)), dec!(360)).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_shorter_repayment_raises_payment() {
        let rate = monthly_rate(dec!(2.185));
        let full = level_payment(dec!(8_000_000), rate, dec!(360)).unwrap();
        let after_grace = level_payment(dec!(8_000_000), rate, dec!(324)).unwrap();
        assert!(after_grace > full);
    }

    #[test]
    fn test_level_payment_factor_overflow_tends_to_interest_only() {
        // 1.0667^1200 is far past Decimal range
        let rate = monthly_rate(dec!(80));
        let pmt = level_payment(dec!(8_000_000), rate, dec!(1200)).unwrap();
        assert_eq!(pmt, interest_only_payment(dec!(8_000_000), rate));
        assert_close(pmt, dec!(533333.33), dec!(0.01), "overflowed annuity factor");
    }

    #[test]
    fn test_level_payment_large_factor_close_to_interest_only() {
        // Factor stays in range but dwarfs 1
        let rate = monthly_rate(dec!(80));
        let pmt = level_payment(dec!(8_000_000), rate, dec!(600)).unwrap();
        assert_close(pmt, dec!(533333.33), dec!(0.01), "large annuity factor");
    }

    #[test]
    fn test_interest_only_payment() {
        let pmt = interest_only_payment(dec!(6_000_000), monthly_rate(dec!(2.5)));
        assert_close(pmt, dec!(12500), dec!(0.0001), "interest only");
    }
}
