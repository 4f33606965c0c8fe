use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as entered and displayed (6.5 = 6.5%).
pub type Percent = Decimal;

/// Periodic rates expressed as decimals (0.005 = 0.5% per period).
pub type Rate = Decimal;

/// The deal being evaluated, as entered in the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParameters {
    /// Acquisition price
    pub purchase_price: Money,
    /// Equity contribution as a percentage of purchase price
    pub down_payment_percent: Percent,
    /// Nominal annual interest rate
    pub interest_rate_annual_percent: Percent,
    /// Amortization horizon in years
    pub loan_term_years: u32,
    /// Scheduled rent before vacancy
    pub monthly_gross_rent: Money,
    /// Expected income lost to vacancy
    pub vacancy_rate_percent: Percent,
    pub annual_property_taxes: Money,
    pub annual_insurance: Money,
    pub annual_maintenance: Money,
    /// One-time renovation spend at acquisition
    pub rehab_costs: Money,
    /// One-time transaction costs at acquisition
    pub closing_costs: Money,
}

impl Default for DealParameters {
    /// The sandbox's opening deal: a $750k rental with 25% down.
    fn default() -> Self {
        Self {
            purchase_price: dec!(750000),
            down_payment_percent: dec!(25),
            interest_rate_annual_percent: dec!(7.2),
            loan_term_years: 30,
            monthly_gross_rent: dec!(5800),
            vacancy_rate_percent: dec!(4),
            annual_property_taxes: dec!(9000),
            annual_insurance: dec!(2400),
            annual_maintenance: dec!(3600),
            rehab_costs: dec!(45000),
            closing_costs: dec!(18000),
        }
    }
}

/// Static market reference data used for comparison and the IRR proxy.
/// Supplied by the caller; never computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBenchmark {
    pub average_cap_rate: Percent,
    pub market_appreciation_percent: Percent,
    pub rent_growth_percent: Percent,
    #[serde(default)]
    pub competitive_analysis: String,
}

impl Default for MarketBenchmark {
    fn default() -> Self {
        Self {
            average_cap_rate: dec!(5.8),
            market_appreciation_percent: dec!(4.2),
            rent_growth_percent: dec!(3.1),
            competitive_analysis: "Above Market Average".to_string(),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
