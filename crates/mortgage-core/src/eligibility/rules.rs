//! Underwriting rule tables.
//!
//! Two independent ordered band tables drive the evaluation: the loan-to-value
//! reduction applied after the trial payment, and the risk status assigned
//! from the final ratio. Each is resolved by a single first-match lookup.
//! Ratios are income / debt in percent; `None` means there is no debt to
//! divide by and falls into the open-ended top band.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::group_thousands;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Base loan-to-value
// ---------------------------------------------------------------------------

/// Base loan-to-value for a first home.
pub const FIRST_HOME_BASE: Rate = dec!(0.8);

/// Base loan-to-value when the borrower already holds a mortgage.
pub const SECOND_HOME_BASE: Rate = dec!(0.5);

pub const FIRST_HOME_BASE_MESSAGE: &str = "首購資格，基礎成數為 8 成。";
pub const SECOND_HOME_BASE_MESSAGE: &str = "名下已有房貸（第二戶），基礎成數降為 5 成。";

/// Income needed per unit of final monthly debt (a 160% ratio).
pub const REQUIRED_INCOME_MULTIPLIER: Decimal = dec!(1.6);

pub const GUARANTOR_ONLY_MESSAGE: &str =
    "借款人無收入，完全依賴保證人還款能力，建議保證人為二等親內親屬（如配偶）。";

/// Starting loan-to-value and the message explaining it.
pub fn base_percentage(is_second_home: bool) -> (Rate, &'static str) {
    if is_second_home {
        (SECOND_HOME_BASE, SECOND_HOME_BASE_MESSAGE)
    } else {
        (FIRST_HOME_BASE, FIRST_HOME_BASE_MESSAGE)
    }
}

/// Message reporting the guarantor figures folded into the ratio.
pub fn guarantor_message(income: Money, expenses: Money) -> String {
    format!(
        "已計入保證人收入 {} 元與支出 {} 元。",
        group_thousands(income),
        group_thousands(expenses)
    )
}

// ---------------------------------------------------------------------------
// Loan-to-value reduction bands
// ---------------------------------------------------------------------------

/// One row of the loan-to-value reduction table: `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentBand {
    pub lower: Decimal,
    /// Exclusive upper bound; `None` is unbounded.
    pub upper: Option<Decimal>,
    /// Subtracted from the base loan-to-value.
    pub reduction: Rate,
    pub first_home_message: &'static str,
    pub second_home_message: &'static str,
}

impl AdjustmentBand {
    pub fn contains(&self, ratio: Option<Decimal>) -> bool {
        band_contains(self.lower, self.upper, ratio)
    }

    pub fn message(&self, is_second_home: bool) -> &'static str {
        if is_second_home {
            self.second_home_message
        } else {
            self.first_home_message
        }
    }
}

pub const ADJUSTMENT_BANDS: &[AdjustmentBand] = &[
    AdjustmentBand {
        lower: Decimal::MIN,
        upper: Some(dec!(140)),
        reduction: dec!(0.20),
        first_home_message: "收支比低於 140%，依規定成數大幅調降至 6 成。",
        second_home_message: "收支比低於 140%，第二戶成數調降至 3 成。",
    },
    AdjustmentBand {
        lower: dec!(140),
        upper: Some(dec!(160)),
        reduction: dec!(0.10),
        first_home_message: "收支比低於 160%，依規定成數減少 1 成。",
        second_home_message: "收支比低於 160%，依規定成數減少 1 成。",
    },
    AdjustmentBand {
        lower: dec!(160),
        upper: Some(dec!(180)),
        reduction: dec!(0.05),
        first_home_message: "收支比低於 180%，依規定成數減少 0.5 成。",
        second_home_message: "收支比低於 180%，依規定成數減少 0.5 成。",
    },
    AdjustmentBand {
        lower: dec!(180),
        upper: Some(dec!(200)),
        reduction: Decimal::ZERO,
        first_home_message: "收支比低於 200%，可能影響核貸條件，建議增加收入或保證人。",
        second_home_message: "收支比低於 200%，可能影響核貸條件，建議增加收入或保證人。",
    },
    AdjustmentBand {
        lower: dec!(200),
        upper: None,
        reduction: Decimal::ZERO,
        first_home_message: "收支比高於 200%，符合銀行優質核貸標準。",
        second_home_message: "收支比高於 200%，符合銀行優質核貸標準。",
    },
];

/// The reduction band a trial ratio falls into.
pub fn adjustment_band(ratio: Option<Decimal>) -> &'static AdjustmentBand {
    ADJUSTMENT_BANDS
        .iter()
        .find(|band| band.contains(ratio))
        .unwrap_or(&ADJUSTMENT_BANDS[ADJUSTMENT_BANDS.len() - 1])
}

// ---------------------------------------------------------------------------
// Risk status bands
// ---------------------------------------------------------------------------

/// Qualitative classification of the final income/debt ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Healthy,
    Warning,
    Danger,
}

impl RiskStatus {
    /// Headline shown alongside the result.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Healthy => "財務健康，核貸成數高",
            Self::Warning => "收支比略低，成數可能受限",
            Self::Danger => "收支比過低，建議增加收入",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusBand {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub status: RiskStatus,
}

pub const STATUS_BANDS: &[StatusBand] = &[
    StatusBand {
        lower: Decimal::MIN,
        upper: Some(dec!(130)),
        status: RiskStatus::Danger,
    },
    StatusBand {
        lower: dec!(130),
        upper: Some(dec!(200)),
        status: RiskStatus::Warning,
    },
    StatusBand {
        lower: dec!(200),
        upper: None,
        status: RiskStatus::Healthy,
    },
];

/// Risk status for a final ratio.
pub fn status_for(ratio: Option<Decimal>) -> RiskStatus {
    STATUS_BANDS
        .iter()
        .find(|band| band_contains(band.lower, band.upper, ratio))
        .map(|band| band.status)
        .unwrap_or(RiskStatus::Healthy)
}

fn band_contains(lower: Decimal, upper: Option<Decimal>, ratio: Option<Decimal>) -> bool {
    match ratio {
        None => upper.is_none(),
        Some(r) => r >= lower && upper.map_or(true, |u| r < u),
    }
}
