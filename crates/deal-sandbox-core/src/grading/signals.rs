use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DealSandboxError;
use crate::types::{MarketBenchmark, Money, Percent};
use crate::DealSandboxResult;

/// Traffic-light band for cash-on-cash return on the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnBand {
    /// 8% or better
    Strong,
    /// 5% up to 8%
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPosition {
    AtOrAboveMarket,
    BelowMarket,
}

/// Quick-read indicators shown alongside the grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSignals {
    pub cash_flow_positive: bool,
    pub cash_on_cash_band: ReturnBand,
    pub cap_rate_position: MarketPosition,
    /// Deal cap rate minus the market average, in percentage points
    pub cap_rate_spread: Percent,
}

pub fn return_band(cash_on_cash_return: Percent) -> ReturnBand {
    if cash_on_cash_return >= dec!(8) {
        ReturnBand::Strong
    } else if cash_on_cash_return >= dec!(5) {
        ReturnBand::Moderate
    } else {
        ReturnBand::Weak
    }
}

pub fn compute_signals(
    monthly_cash_flow: Money,
    cash_on_cash_return: Percent,
    cap_rate: Percent,
    benchmark: &MarketBenchmark,
) -> DealSandboxResult<DealSignals> {
    let cap_rate_position = if cap_rate >= benchmark.average_cap_rate {
        MarketPosition::AtOrAboveMarket
    } else {
        MarketPosition::BelowMarket
    };

    let cap_rate_spread = cap_rate
        .checked_sub(benchmark.average_cap_rate)
        .ok_or_else(|| DealSandboxError::overflow("cap rate spread"))?;

    Ok(DealSignals {
        cash_flow_positive: monthly_cash_flow >= Decimal::ZERO,
        cash_on_cash_band: return_band(cash_on_cash_return),
        cap_rate_position,
        cap_rate_spread,
    })
}
