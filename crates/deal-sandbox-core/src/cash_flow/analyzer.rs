use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DealSandboxError;
use crate::types::{DealParameters, Money};
use crate::DealSandboxResult;

/// Monthly and annual cash position of a leveraged rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowBreakdown {
    /// Rent net of vacancy loss
    pub monthly_income: Money,
    /// Debt service plus pro-rated taxes, insurance and maintenance
    pub monthly_expenses: Money,
    /// Income less expenses; negative for a cash-flow-negative deal
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Cash committed at acquisition: down payment, rehab and closing
    pub total_investment: Money,
}

/// Combine effective rent, debt service and fixed operating costs.
pub fn compute_cash_flow(
    params: &DealParameters,
    monthly_payment: Money,
) -> DealSandboxResult<CashFlowBreakdown> {
    let monthly_income = effective_monthly_income(params)?;

    let monthly_expenses = [
        params.annual_property_taxes,
        params.annual_insurance,
        params.annual_maintenance,
    ]
    .iter()
    .try_fold(monthly_payment, |acc, annual| acc.checked_add(*annual / dec!(12)))
    .ok_or_else(|| DealSandboxError::overflow("monthly expenses"))?;

    let monthly_cash_flow = monthly_income
        .checked_sub(monthly_expenses)
        .ok_or_else(|| DealSandboxError::overflow("monthly cash flow"))?;
    let annual_cash_flow = monthly_cash_flow
        .checked_mul(dec!(12))
        .ok_or_else(|| DealSandboxError::overflow("annual cash flow"))?;

    Ok(CashFlowBreakdown {
        monthly_income,
        monthly_expenses,
        monthly_cash_flow,
        annual_cash_flow,
        total_investment: total_investment(params)?,
    })
}

/// Gross rent after the vacancy allowance.
pub fn effective_monthly_income(params: &DealParameters) -> DealSandboxResult<Money> {
    params
        .monthly_gross_rent
        .checked_mul(Decimal::ONE - params.vacancy_rate_percent / dec!(100))
        .ok_or_else(|| DealSandboxError::overflow("effective rent"))
}

/// Down payment plus one-time rehab and closing costs.
pub fn total_investment(params: &DealParameters) -> DealSandboxResult<Money> {
    params
        .purchase_price
        .checked_mul(params.down_payment_percent / dec!(100))
        .and_then(|down| down.checked_add(params.rehab_costs))
        .and_then(|sum| sum.checked_add(params.closing_costs))
        .ok_or_else(|| DealSandboxError::overflow("total investment"))
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_income_net_of_vacancy() {
        let cf = compute_cash_flow(&scenario_a(), dec!(1264.14)).unwrap();
        // 2200 * 0.95
        assert_eq!(cf.monthly_income, dec!(2090));
    }

    #[test]
    fn test_expenses_include_pro_rated_costs() {
        let cf = compute_cash_flow(&scenario_a(), dec!(1264.14)).unwrap();
        // 1264.14 + 250 + 100 + 125
        assert_eq!(cf.monthly_expenses, dec!(1739.14));
        assert_eq!(cf.monthly_cash_flow, dec!(350.86));
        assert_eq!(cf.annual_cash_flow, dec!(4210.32));
    }

    #[test]
    fn test_total_investment() {
        let cf = compute_cash_flow(&scenario_a(), dec!(1264.14)).unwrap();
        // 50000 down + 15000 rehab + 5000 closing
        assert_eq!(cf.total_investment, dec!(70000));
    }

    #[test]
    fn test_negative_cash_flow_is_reported() {
        let mut params = scenario_a();
        params.monthly_gross_rent = dec!(1000);
        let cf = compute_cash_flow(&params, dec!(1264.14)).unwrap();
        assert!(cf.monthly_cash_flow < Decimal::ZERO);
        assert_eq!(cf.annual_cash_flow, cf.monthly_cash_flow * dec!(12));
    }

    #[test]
    fn test_full_vacancy_zero_income() {
        let mut params = scenario_a();
        params.vacancy_rate_percent = dec!(100);
        assert_eq!(effective_monthly_income(&params).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_down_payment_scaled_before_multiplying() {
        // price × down alone would exceed the decimal range
        let params = DealParameters {
            purchase_price: dec!(1000000000000000000000000000),
            down_payment_percent: dec!(100),
            rehab_costs: Decimal::ZERO,
            closing_costs: Decimal::ZERO,
            ..scenario_a()
        };
        assert_eq!(
            total_investment(&params).unwrap(),
            dec!(1000000000000000000000000000)
        );
    }

    #[test]
    fn test_overflowing_rent_is_typed_error() {
        let params = DealParameters {
            monthly_gross_rent: Decimal::MAX,
            vacancy_rate_percent: Decimal::ZERO,
            ..scenario_a()
        };
        // Income survives; the annualised figure cannot
        assert!(effective_monthly_income(&params).is_ok());
        assert!(matches!(
            compute_cash_flow(&params, Decimal::ZERO),
            Err(DealSandboxError::ComputationDegenerate(_))
        ));
    }
}
