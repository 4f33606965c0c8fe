use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::paydown::{principal_paid, remaining_balance};
use crate::amortization::payment::{loan_amount, monthly_rate};
use crate::cash_flow::analyzer::CashFlowBreakdown;
use crate::error::DealSandboxError;
use crate::returns::metrics::ReturnMetrics;
use crate::time_value::{self, compound_factor};
use crate::types::{DealParameters, MarketBenchmark, Money, Percent};
use crate::DealSandboxResult;

/// Share of annual debt service treated as principal paydown by the heuristic.
const EQUITY_BUILD_FRACTION: Decimal = dec!(0.3);

/// Longest hold the discounted IRR will project.
pub const MAX_HOLDING_PERIOD_YEARS: u32 = 50;

/// How the IRR estimate is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrMethod {
    /// Cash-on-cash return plus market appreciation. An approximation, not a
    /// discounted-cash-flow IRR.
    #[default]
    Proxy,
    /// Newton-Raphson IRR over a projected hold ending in a sale.
    Discounted { holding_period_years: u32 },
}

/// How year-one equity build is estimated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquityBuildMethod {
    /// 30% of annual debt service.
    #[default]
    Heuristic,
    /// Principal actually repaid over the first twelve payments.
    Amortized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedOptions {
    #[serde(default)]
    pub irr_method: IrrMethod,
    #[serde(default)]
    pub equity_build_method: EquityBuildMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedMetrics {
    pub irr_estimate: Percent,
    pub equity_build_estimate: Money,
}

/// IRR and equity-build estimates for the institutional view.
///
/// Never fails on a sanitized deal: when the discounted IRR cannot be solved
/// the proxy is reported instead and a warning is recorded.
pub fn compute_extended_metrics(
    params: &DealParameters,
    monthly_payment: Money,
    cash_flow: &CashFlowBreakdown,
    returns: &ReturnMetrics,
    benchmark: &MarketBenchmark,
    options: &ExtendedOptions,
    warnings: &mut Vec<String>,
) -> DealSandboxResult<ExtendedMetrics> {
    let proxy = returns
        .cash_on_cash_return
        .checked_add(benchmark.market_appreciation_percent)
        .ok_or_else(|| DealSandboxError::overflow("IRR proxy"))?;

    let irr_estimate = match options.irr_method {
        IrrMethod::Proxy => proxy,
        IrrMethod::Discounted {
            holding_period_years,
        } => {
            if holding_period_years == 0 || holding_period_years > MAX_HOLDING_PERIOD_YEARS {
                return Err(DealSandboxError::InvalidParameter {
                    field: "holding_period_years".into(),
                    reason: format!(
                        "Holding period must be between 1 and {MAX_HOLDING_PERIOD_YEARS} years"
                    ),
                });
            }
            match discounted_irr(params, monthly_payment, cash_flow, benchmark, holding_period_years)
            {
                Ok(irr) => irr,
                Err(e) => {
                    warnings.push(format!(
                        "Discounted IRR unavailable ({e}); reporting cash-on-cash plus appreciation instead"
                    ));
                    proxy
                }
            }
        }
    };

    let equity_build_estimate = match options.equity_build_method {
        EquityBuildMethod::Heuristic => monthly_payment
            .checked_mul(dec!(12))
            .and_then(|annual| annual.checked_mul(EQUITY_BUILD_FRACTION))
            .ok_or_else(|| DealSandboxError::overflow("equity build"))?,
        EquityBuildMethod::Amortized => principal_paid(
            loan_amount(params.purchase_price, params.down_payment_percent),
            monthly_rate(params.interest_rate_annual_percent),
            u64::from(params.loan_term_years) * 12,
            12,
        )?,
    };

    Ok(ExtendedMetrics {
        irr_estimate,
        equity_build_estimate,
    })
}

/// Annual cash flows of a hold: equity out at year 0, levered cash flow each
/// year with rent growing at the benchmark rate, sale net of the remaining
/// loan balance in the final year.
pub fn projected_cash_flows(
    params: &DealParameters,
    monthly_payment: Money,
    cash_flow: &CashFlowBreakdown,
    benchmark: &MarketBenchmark,
    holding_period_years: u32,
) -> DealSandboxResult<Vec<Money>> {
    let overflow = DealSandboxError::overflow;

    let annual_income = cash_flow
        .monthly_income
        .checked_mul(dec!(12))
        .ok_or_else(|| overflow("annual rent"))?;
    let annual_fixed_costs = params
        .annual_property_taxes
        .checked_add(params.annual_insurance)
        .and_then(|sum| sum.checked_add(params.annual_maintenance))
        .ok_or_else(|| overflow("operating costs"))?;
    let annual_debt_service = monthly_payment
        .checked_mul(dec!(12))
        .ok_or_else(|| overflow("debt service"))?;
    let rent_growth = benchmark.rent_growth_percent / dec!(100);
    let appreciation = benchmark.market_appreciation_percent / dec!(100);

    let mut flows = Vec::with_capacity(holding_period_years as usize + 1);
    flows.push(-cash_flow.total_investment);

    for year in 1..=holding_period_years {
        let growth = compound_factor(rent_growth, u64::from(year - 1))
            .ok_or_else(|| overflow("rent growth"))?;
        let year_flow = annual_income
            .checked_mul(growth)
            .and_then(|income| income.checked_sub(annual_fixed_costs))
            .and_then(|net| net.checked_sub(annual_debt_service))
            .ok_or_else(|| overflow("projected cash flow"))?;
        flows.push(year_flow);
    }

    let price_growth = compound_factor(appreciation, u64::from(holding_period_years))
        .ok_or_else(|| overflow("appreciation"))?;
    let sale_price = params
        .purchase_price
        .checked_mul(price_growth)
        .ok_or_else(|| overflow("sale price"))?;
    let balance = remaining_balance(
        loan_amount(params.purchase_price, params.down_payment_percent),
        monthly_rate(params.interest_rate_annual_percent),
        u64::from(params.loan_term_years) * 12,
        u64::from(holding_period_years) * 12,
    )?;

    if let Some(last) = flows.last_mut() {
        let final_year = *last;
        *last = sale_price
            .checked_sub(balance)
            .and_then(|proceeds| final_year.checked_add(proceeds))
            .ok_or_else(|| overflow("sale proceeds"))?;
    }

    Ok(flows)
}

fn discounted_irr(
    params: &DealParameters,
    monthly_payment: Money,
    cash_flow: &CashFlowBreakdown,
    benchmark: &MarketBenchmark,
    holding_period_years: u32,
) -> DealSandboxResult<Percent> {
    if cash_flow.total_investment <= Decimal::ZERO {
        return Err(DealSandboxError::ComputationDegenerate(
            "no equity invested".into(),
        ));
    }
    let flows = projected_cash_flows(
        params,
        monthly_payment,
        cash_flow,
        benchmark,
        holding_period_years,
    )?;
    let rate = time_value::irr(&flows, dec!(0.10))?;
    Ok(rate * dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::payment::compute_monthly_payment;
    use crate::cash_flow::analyzer::compute_cash_flow;
    use crate::returns::metrics::compute_return_metrics;
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

    fn run(options: &ExtendedOptions) -> (ExtendedMetrics, ReturnMetrics, Money, Vec<String>) {
        let params = scenario_a();
        let payment = compute_monthly_payment(
            params.purchase_price,
            params.down_payment_percent,
            params.interest_rate_annual_percent,
            params.loan_term_years,
        )
        .unwrap();
        let cf = compute_cash_flow(&params, payment).unwrap();
        let returns = compute_return_metrics(&params, &cf).unwrap();
        let mut warnings = Vec::new();
        let ext = compute_extended_metrics(
            &params,
            payment,
            &cf,
            &returns,
            &MarketBenchmark::default(),
            options,
            &mut warnings,
        )
        .unwrap();
        (ext, returns, payment, warnings)
    }

    #[test]
    fn test_proxy_irr_adds_appreciation() {
        let (ext, returns, _, warnings) = run(&ExtendedOptions::default());
        assert_eq!(ext.irr_estimate, returns.cash_on_cash_return + dec!(4.2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_heuristic_equity_build() {
        let (ext, _, payment, _) = run(&ExtendedOptions::default());
        // 30% of annual debt service, ~$4,551 on Scenario A
        assert!((ext.equity_build_estimate - payment * dec!(3.6)).abs() < dec!(0.000001));
        assert!((ext.equity_build_estimate - dec!(4550.89)).abs() < dec!(0.01));
    }

    #[test]
    fn test_amortized_equity_build_below_debt_service() {
        let options = ExtendedOptions {
            equity_build_method: EquityBuildMethod::Amortized,
            ..Default::default()
        };
        let (ext, _, payment, _) = run(&options);
        assert!(ext.equity_build_estimate > Decimal::ZERO);
        assert!(ext.equity_build_estimate < payment * dec!(12));
    }

    #[test]
    fn test_discounted_irr_converges() {
        let options = ExtendedOptions {
            irr_method: IrrMethod::Discounted {
                holding_period_years: 10,
            },
            ..Default::default()
        };
        let (ext, returns, _, warnings) = run(&options);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        // Appreciation and paydown on a levered hold beat the year-one yield
        assert!(ext.irr_estimate > returns.cash_on_cash_return);
        assert!(ext.irr_estimate < dec!(50));
    }

    #[test]
    fn test_discounted_irr_negative_return_hold() {
        // No rent and flat prices: every hold loses money, but the IRR is
        // still well defined and must not fall back to the proxy.
        let params = DealParameters {
            monthly_gross_rent: Decimal::ZERO,
            ..scenario_a()
        };
        let benchmark = MarketBenchmark {
            market_appreciation_percent: Decimal::ZERO,
            ..MarketBenchmark::default()
        };
        let payment = compute_monthly_payment(
            params.purchase_price,
            params.down_payment_percent,
            params.interest_rate_annual_percent,
            params.loan_term_years,
        )
        .unwrap();
        let cf = compute_cash_flow(&params, payment).unwrap();
        let returns = compute_return_metrics(&params, &cf).unwrap();

        for holding_period_years in [10, 20, 30, 40, 50] {
            let options = ExtendedOptions {
                irr_method: IrrMethod::Discounted {
                    holding_period_years,
                },
                ..Default::default()
            };
            let mut warnings = Vec::new();
            let ext = compute_extended_metrics(
                &params,
                payment,
                &cf,
                &returns,
                &benchmark,
                &options,
                &mut warnings,
            )
            .unwrap();

            assert!(warnings.is_empty(), "{holding_period_years}y: {warnings:?}");
            assert!(
                ext.irr_estimate < Decimal::ZERO && ext.irr_estimate > dec!(-99),
                "{holding_period_years}y IRR {}",
                ext.irr_estimate
            );
            assert_ne!(ext.irr_estimate, returns.cash_on_cash_return);
        }
    }

    #[test]
    fn test_projected_cash_flows_shape() {
        let params = scenario_a();
        let payment = dec!(1264.14);
        let cf = compute_cash_flow(&params, payment).unwrap();
        let flows =
            projected_cash_flows(&params, payment, &cf, &MarketBenchmark::default(), 5).unwrap();

        assert_eq!(flows.len(), 6);
        assert_eq!(flows[0], dec!(-70000));
        // Year one matches the static annual cash flow
        assert_eq!(flows[1], cf.annual_cash_flow);
        // Sale proceeds land in the final year
        assert!(flows[5] > flows[4] + dec!(50000));
    }

    #[test]
    fn test_discounted_irr_rejects_zero_hold() {
        let params = scenario_a();
        let cf = compute_cash_flow(&params, dec!(1264.14)).unwrap();
        let returns = compute_return_metrics(&params, &cf).unwrap();
        let options = ExtendedOptions {
            irr_method: IrrMethod::Discounted {
                holding_period_years: 0,
            },
            ..Default::default()
        };
        let result = compute_extended_metrics(
            &params,
            dec!(1264.14),
            &cf,
            &returns,
            &MarketBenchmark::default(),
            &options,
            &mut Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_discounted_irr_falls_back_without_equity() {
        let mut params = scenario_a();
        params.down_payment_percent = Decimal::ZERO;
        params.rehab_costs = Decimal::ZERO;
        params.closing_costs = Decimal::ZERO;
        let cf = compute_cash_flow(&params, dec!(1580)).unwrap();
        let returns = compute_return_metrics(&params, &cf).unwrap();
        let options = ExtendedOptions {
            irr_method: IrrMethod::Discounted {
                holding_period_years: 5,
            },
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let ext = compute_extended_metrics(
            &params,
            dec!(1580),
            &cf,
            &returns,
            &MarketBenchmark::default(),
            &options,
            &mut warnings,
        )
        .unwrap();

        assert_eq!(ext.irr_estimate, dec!(4.2));
        assert_eq!(warnings.len(), 1);
    }
}
