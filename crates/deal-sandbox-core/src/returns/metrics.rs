use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cash_flow::analyzer::CashFlowBreakdown;
use crate::error::DealSandboxError;
use crate::types::{DealParameters, Money, Percent};
use crate::DealSandboxResult;

/// Yield measures derived from cash flow, price and invested capital.
/// All ratios are percentages and default to zero when their base is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    /// Effective rent less taxes, insurance and maintenance (excludes debt service)
    pub net_operating_income: Money,
    /// Annual cash flow / total investment
    pub cash_on_cash_return: Percent,
    /// NOI / purchase price
    pub cap_rate: Percent,
    /// NOI / total investment
    pub roi: Percent,
}

pub fn compute_return_metrics(
    params: &DealParameters,
    cash_flow: &CashFlowBreakdown,
) -> DealSandboxResult<ReturnMetrics> {
    let noi = net_operating_income(params)?;
    let invested = cash_flow.total_investment;
    let has_investment = invested > Decimal::ZERO;

    let cap_rate = if has_investment && params.purchase_price > Decimal::ZERO {
        percent_of(noi, params.purchase_price, "cap rate")?
    } else {
        Decimal::ZERO
    };

    let roi = if has_investment {
        percent_of(noi, invested, "ROI")?
    } else {
        Decimal::ZERO
    };

    let cash_on_cash_return = if has_investment {
        percent_of(cash_flow.annual_cash_flow, invested, "cash-on-cash return")?
    } else {
        Decimal::ZERO
    };

    Ok(ReturnMetrics {
        net_operating_income: noi,
        cash_on_cash_return,
        cap_rate,
        roi,
    })
}

/// Annual effective rent less fixed operating costs.
pub fn net_operating_income(params: &DealParameters) -> DealSandboxResult<Money> {
    let overflow = || DealSandboxError::overflow("net operating income");

    let annual_income = params
        .monthly_gross_rent
        .checked_mul(dec!(12))
        .and_then(|gross| gross.checked_mul(Decimal::ONE - params.vacancy_rate_percent / dec!(100)))
        .ok_or_else(overflow)?;
    let annual_operating_expenses = params
        .annual_property_taxes
        .checked_add(params.annual_insurance)
        .and_then(|sum| sum.checked_add(params.annual_maintenance))
        .ok_or_else(overflow)?;

    annual_income
        .checked_sub(annual_operating_expenses)
        .ok_or_else(overflow)
}

/// `numerator / denominator` as a percentage; the caller guarantees a
/// non-zero denominator.
fn percent_of(numerator: Money, denominator: Money, context: &str) -> DealSandboxResult<Percent> {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| DealSandboxError::overflow(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash_flow::analyzer::compute_cash_flow;
    use rust_decimal_macros::dec;

    fn scenario_a() -> DealParameters {
        DealParameters {
            purchase_price: dec!(250000),
            down_payment_percent: dec!(20),
            interest_rate_annual_percent: dec!(6.5),
            loan_term_years: 30,
            monthly_gross_rent: dec!(2200),
            vacancy_rate_percent: dec!(5),
            annual_property_taxes: dec!(3000),
            annual_insurance: dec!(1200),
            annual_maintenance: dec!(1500),
            rehab_costs: dec!(15000),
            closing_costs: dec!(5000),
        }
    }

    #[test]
    fn test_noi_excludes_debt_service() {
        // 2200 * 12 * 0.95 - (3000 + 1200 + 1500) = 25080 - 5700
        assert_eq!(net_operating_income(&scenario_a()).unwrap(), dec!(19380));
    }

    #[test]
    fn test_scenario_a_ratios() {
        let params = scenario_a();
        let cf = compute_cash_flow(&params, dec!(1264.14)).unwrap();
        let m = compute_return_metrics(&params, &cf).unwrap();

        // 19380 / 250000
        assert_eq!(m.cap_rate, dec!(7.752));
        // 19380 / 70000
        assert!((m.roi - dec!(27.6857)).abs() < dec!(0.001));
        // 4210.32 / 70000
        assert!((m.cash_on_cash_return - dec!(6.0147)).abs() < dec!(0.001));
    }

    #[test]
    fn test_zero_investment_yields_zero_ratios() {
        let mut params = scenario_a();
        params.down_payment_percent = Decimal::ZERO;
        params.rehab_costs = Decimal::ZERO;
        params.closing_costs = Decimal::ZERO;
        let cf = compute_cash_flow(&params, dec!(1580.17)).unwrap();
        let m = compute_return_metrics(&params, &cf).unwrap();

        assert_eq!(cf.total_investment, Decimal::ZERO);
        assert_eq!(m.cap_rate, Decimal::ZERO);
        assert_eq!(m.roi, Decimal::ZERO);
        assert_eq!(m.cash_on_cash_return, Decimal::ZERO);
    }

    #[test]
    fn test_zero_price_cap_rate_zero() {
        let mut params = scenario_a();
        params.purchase_price = Decimal::ZERO;
        let cf = compute_cash_flow(&params, Decimal::ZERO).unwrap();
        let m = compute_return_metrics(&params, &cf).unwrap();

        // Rehab and closing still count as invested capital
        assert_eq!(cf.total_investment, dec!(20000));
        assert_eq!(m.cap_rate, Decimal::ZERO);
        assert!(m.roi > Decimal::ZERO);
    }

    #[test]
    fn test_negative_cash_flow_negative_coc() {
        let mut params = scenario_a();
        params.monthly_gross_rent = dec!(1200);
        let cf = compute_cash_flow(&params, dec!(1264.14)).unwrap();
        let m = compute_return_metrics(&params, &cf).unwrap();
        assert!(m.cash_on_cash_return < Decimal::ZERO);
    }

    #[test]
    fn test_sub_cent_price_cannot_express_cap_rate() {
        let mut params = scenario_a();
        params.purchase_price = dec!(0.0000000000000000000000000001);
        params.monthly_gross_rent = dec!(1000000000000);
        let cf = compute_cash_flow(&params, Decimal::ZERO).unwrap();
        assert!(matches!(
            compute_return_metrics(&params, &cf),
            Err(DealSandboxError::ComputationDegenerate(_))
        ));
    }
}
