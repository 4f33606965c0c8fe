//! Display strings for the results panel: whole-dollar en-US currency and
//! two-decimal percentages.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Percent};

/// `$1,234`, `-$1,234`. Rounded half away from zero to whole dollars.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);

    if rounded < Decimal::ZERO {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `12.34%`. Always two decimal places.
pub fn format_percentage(percentage: Percent) -> String {
    let mut rounded = percentage.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{rounded:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(feature = "deal")]
pub use summary::*;

#[cfg(feature = "deal")]
mod summary {
    use serde::{Deserialize, Serialize};

    use super::{format_currency, format_percentage};
    use crate::deal::analysis::DealAnalysis;

    /// The calculator's result panel, pre-formatted.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FormattedSummary {
        pub monthly_payment: String,
        pub total_investment: String,
        pub monthly_income: String,
        pub monthly_expenses: String,
        pub monthly_cash_flow: String,
        pub annual_cash_flow: String,
        pub cash_on_cash_return: String,
        pub cap_rate: String,
        pub roi: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub irr_estimate: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub equity_build_estimate: Option<String>,
        /// e.g. `BBB · Market Rate`
        pub grade: String,
    }

    pub fn summarize(analysis: &DealAnalysis) -> FormattedSummary {
        let r = &analysis.results;
        FormattedSummary {
            monthly_payment: format_currency(r.monthly_payment),
            total_investment: format_currency(r.total_investment),
            monthly_income: format_currency(r.monthly_income),
            monthly_expenses: format_currency(r.monthly_expenses),
            monthly_cash_flow: format_currency(r.monthly_cash_flow),
            annual_cash_flow: format_currency(r.annual_cash_flow),
            cash_on_cash_return: format_percentage(r.cash_on_cash_return),
            cap_rate: format_percentage(r.cap_rate),
            roi: format_percentage(r.roi),
            irr_estimate: r.irr_estimate.map(format_percentage),
            equity_build_estimate: r.equity_build_estimate.map(format_currency),
            grade: if analysis.grade.rating == analysis.grade.label {
                analysis.grade.label.clone()
            } else {
                format!("{} · {}", analysis.grade.rating, analysis.grade.label)
            },
        }
    }
}
