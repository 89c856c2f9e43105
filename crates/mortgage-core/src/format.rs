//! Display helpers for amounts quoted back to the applicant.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits kept when grouping; further digits are rounded away.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Render an amount with comma thousands separators (`100000` -> `100,000`).
///
/// Trailing fractional zeros are dropped and at most three fraction digits
/// are kept.
pub fn group_thousands(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    let digits = int_part.len();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_groups_whole_amounts() {
        assert_eq!(group_thousands(dec!(100000)), "100,000");
        assert_eq!(group_thousands(dec!(20000)), "20,000");
        assert_eq!(group_thousands(dec!(1234567)), "1,234,567");
        assert_eq!(group_thousands(dec!(999)), "999");
    }

    #[test]
    fn test_zero() {
        assert_eq!(group_thousands(Decimal::ZERO), "0");
        assert_eq!(group_thousands(dec!(0.000)), "0");
    }

    #[test]
    fn test_fraction_trimmed_and_rounded() {
        assert_eq!(group_thousands(dec!(12500.50)), "12,500.5");
        assert_eq!(group_thousands(dec!(1000.12345)), "1,000.123");
        assert_eq!(group_thousands(dec!(1000.0005)), "1,000.001");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(group_thousands(dec!(-45000)), "-45,000");
    }
}
