use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use deal_sandbox_core::types::{Money, Percent};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(value: &str) -> NapiResult<Decimal> {
    value.trim().parse::<Decimal>().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deal analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: deal_sandbox_core::deal::analysis::DealAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_sandbox_core::deal::analysis::analyze_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn summarize_deal(input_json: String) -> NapiResult<String> {
    let input: deal_sandbox_core::deal::analysis::DealAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_sandbox_core::deal::analysis::analyze_deal(&input).map_err(to_napi_error)?;
    let summary = deal_sandbox_core::format::summarize(&output.result);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

fn default_down_payment_percent() -> Percent {
    Decimal::from(20)
}

fn default_loan_term_years() -> u32 {
    30
}

#[derive(Deserialize)]
struct LoanInput {
    purchase_price: Money,
    #[serde(default = "default_down_payment_percent")]
    down_payment_percent: Percent,
    interest_rate_annual_percent: Percent,
    #[serde(default = "default_loan_term_years")]
    loan_term_years: u32,
}

#[derive(Serialize)]
struct LoanPayment {
    loan_amount: Money,
    monthly_payment: Money,
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let monthly_payment = deal_sandbox_core::amortization::payment::compute_monthly_payment(
        input.purchase_price,
        input.down_payment_percent,
        input.interest_rate_annual_percent,
        input.loan_term_years,
    )
    .map_err(to_napi_error)?;
    let output = LoanPayment {
        loan_amount: deal_sandbox_core::amortization::payment::loan_amount(
            input.purchase_price,
            input.down_payment_percent,
        ),
        monthly_payment,
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GradeInput {
    cash_on_cash_return: Percent,
    #[serde(default)]
    scale: deal_sandbox_core::grading::classifier::GradingScale,
}

#[napi]
pub fn grade_deal(input_json: String) -> NapiResult<String> {
    let input: GradeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let grade =
        deal_sandbox_core::grading::classifier::grade_deal(input.cash_on_cash_return, input.scale);
    serde_json::to_string(&grade).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    Ok(deal_sandbox_core::format::format_currency(parse_decimal(&amount)?))
}

#[napi]
pub fn format_percentage(percentage: String) -> NapiResult<String> {
    Ok(deal_sandbox_core::format::format_percentage(parse_decimal(&percentage)?))
}
