use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::payment::compute_monthly_payment;
use crate::cash_flow::analyzer::{compute_cash_flow, CashFlowBreakdown};
use crate::deal::parameters::{sanitize_parameters, ParameterPolicy};
use crate::grading::classifier::{grade_deal, DealGrade, GradingScale};
use crate::grading::signals::{compute_signals, DealSignals};
use crate::returns::extended::{compute_extended_metrics, ExtendedOptions, IrrMethod};
use crate::returns::metrics::compute_return_metrics;
use crate::types::{with_metadata, ComputationOutput, DealParameters, MarketBenchmark, Money, Percent};
use crate::DealSandboxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which view of the deal to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    /// Payment, cash flow, cash-on-cash, cap rate and ROI; graded Excellent..Poor
    #[default]
    Basic,
    /// Adds IRR and equity-build estimates; graded AAA..B
    Extended,
}

impl AnalysisMode {
    pub fn default_scale(&self) -> GradingScale {
        match self {
            AnalysisMode::Basic => GradingScale::Basic,
            AnalysisMode::Extended => GradingScale::Institutional,
        }
    }
}

/// Everything the engine needs for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealAnalysisInput {
    pub parameters: DealParameters,
    #[serde(default)]
    pub mode: AnalysisMode,
    #[serde(default)]
    pub benchmark: MarketBenchmark,
    /// Overrides the scale implied by `mode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_scale: Option<GradingScale>,
    #[serde(default)]
    pub extended: ExtendedOptions,
    #[serde(default)]
    pub parameter_policy: ParameterPolicy,
}

impl DealAnalysisInput {
    pub fn new(parameters: DealParameters, mode: AnalysisMode) -> Self {
        Self {
            parameters,
            mode,
            benchmark: MarketBenchmark::default(),
            grading_scale: None,
            extended: ExtendedOptions::default(),
            parameter_policy: ParameterPolicy::default(),
        }
    }

    pub fn grading_scale(&self) -> GradingScale {
        self.grading_scale.unwrap_or_else(|| self.mode.default_scale())
    }
}

/// Derived deal economics. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResults {
    pub monthly_payment: Money,
    pub total_investment: Money,
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub net_operating_income: Money,
    pub cash_on_cash_return: Percent,
    pub cap_rate: Percent,
    pub roi: Percent,
    /// Extended mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irr_estimate: Option<Percent>,
    /// Extended mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_build_estimate: Option<Money>,
}

/// Complete deal analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealAnalysis {
    /// Parameters after sanitization, i.e. the values actually used
    pub parameters: DealParameters,
    pub results: DealResults,
    pub grade: DealGrade,
    pub signals: DealSignals,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline: payment, cash flow, returns, grade and signals.
pub fn analyze_deal(
    input: &DealAnalysisInput,
) -> DealSandboxResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let parameters = sanitize_parameters(&input.parameters, input.parameter_policy, &mut warnings)?;

    let results = compute_deal_results(
        &parameters,
        input.mode,
        &input.benchmark,
        &input.extended,
        &mut warnings,
    )?;

    let scale = input.grading_scale();
    let grade = grade_deal(results.cash_on_cash_return, scale);
    debug!(rating = %grade.rating, ?scale, "deal graded");

    let signals = compute_signals(
        results.monthly_cash_flow,
        results.cash_on_cash_return,
        results.cap_rate,
        &input.benchmark,
    )?;

    let output = DealAnalysis {
        parameters,
        results,
        grade,
        signals,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        &methodology(input.mode, &input.extended),
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Derive results from already-sanitized parameters.
pub fn compute_deal_results(
    params: &DealParameters,
    mode: AnalysisMode,
    benchmark: &MarketBenchmark,
    extended: &ExtendedOptions,
    warnings: &mut Vec<String>,
) -> DealSandboxResult<DealResults> {
    let monthly_payment = compute_monthly_payment(
        params.purchase_price,
        params.down_payment_percent,
        params.interest_rate_annual_percent,
        params.loan_term_years,
    )?;
    debug!(%monthly_payment, "amortized payment");

    let cash_flow = compute_cash_flow(params, monthly_payment)?;
    debug!(
        monthly_cash_flow = %cash_flow.monthly_cash_flow,
        total_investment = %cash_flow.total_investment,
        "cash flow"
    );

    let returns = compute_return_metrics(params, &cash_flow)?;
    debug!(
        cash_on_cash = %returns.cash_on_cash_return,
        cap_rate = %returns.cap_rate,
        roi = %returns.roi,
        "return metrics"
    );

    let (irr_estimate, equity_build_estimate) = match mode {
        AnalysisMode::Basic => (None, None),
        AnalysisMode::Extended => {
            let ext = compute_extended_metrics(
                params,
                monthly_payment,
                &cash_flow,
                &returns,
                benchmark,
                extended,
                warnings,
            )?;
            (Some(ext.irr_estimate), Some(ext.equity_build_estimate))
        }
    };

    push_warnings(params, &cash_flow, monthly_payment, warnings);

    Ok(DealResults {
        monthly_payment,
        total_investment: cash_flow.total_investment,
        monthly_income: cash_flow.monthly_income,
        monthly_expenses: cash_flow.monthly_expenses,
        monthly_cash_flow: cash_flow.monthly_cash_flow,
        annual_cash_flow: cash_flow.annual_cash_flow,
        net_operating_income: returns.net_operating_income,
        cash_on_cash_return: returns.cash_on_cash_return,
        cap_rate: returns.cap_rate,
        roi: returns.roi,
        irr_estimate,
        equity_build_estimate,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn push_warnings(
    params: &DealParameters,
    cash_flow: &CashFlowBreakdown,
    monthly_payment: Money,
    warnings: &mut Vec<String>,
) {
    if cash_flow.total_investment.is_zero() {
        warnings.push(
            "Total investment is zero — cash-on-cash, cap rate and ROI reported as 0".into(),
        );
    } else if params.purchase_price.is_zero() {
        warnings.push("Purchase price is zero — cap rate reported as 0".into());
    }

    if cash_flow.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Monthly cash flow of {:.2} is negative — deal does not cover its costs",
            cash_flow.monthly_cash_flow
        ));
    }

    if monthly_payment > cash_flow.monthly_income {
        warnings.push("Debt service exceeds effective rental income".into());
    }

    if params.vacancy_rate_percent > dec!(15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            params.vacancy_rate_percent
        ));
    }
}

fn methodology(mode: AnalysisMode, extended: &ExtendedOptions) -> String {
    let base = "Fixed-rate amortization with cash-on-cash, cap rate and ROI";
    match mode {
        AnalysisMode::Basic => base.to_string(),
        AnalysisMode::Extended => {
            let irr = match extended.irr_method {
                IrrMethod::Proxy => "IRR approximated as cash-on-cash plus market appreciation",
                IrrMethod::Discounted { .. } => "IRR solved over a projected hold with sale",
            };
            format!("{base}; {irr}")
        }
    }
}
