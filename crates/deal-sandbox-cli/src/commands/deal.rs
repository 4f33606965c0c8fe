use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use deal_sandbox_core::deal::analysis::{self, AnalysisMode, DealAnalysisInput};
use deal_sandbox_core::deal::parameters::ParameterPolicy;
use deal_sandbox_core::format;
use deal_sandbox_core::grading::classifier::GradingScale;
use deal_sandbox_core::returns::extended::{EquityBuildMethod, IrrMethod};
use deal_sandbox_core::types::{DealParameters, MarketBenchmark};

use crate::commands::grading::ScaleArg;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Basic,
    Extended,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Basic => AnalysisMode::Basic,
            ModeArg::Extended => AnalysisMode::Extended,
        }
    }
}

/// Deal parameters as individual flags. Unset flags fall back to the
/// sandbox's default deal.
#[derive(Args)]
pub struct DealFlags {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment as a percentage of price
    #[arg(long)]
    pub down: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// Monthly gross rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Vacancy rate in percent
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Annual property taxes
    #[arg(long)]
    pub taxes: Option<Decimal>,

    /// Annual insurance
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Annual maintenance
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// One-time rehab costs
    #[arg(long)]
    pub rehab: Option<Decimal>,

    /// One-time closing costs
    #[arg(long)]
    pub closing: Option<Decimal>,
}

impl DealFlags {
    /// Overwrite only the fields given on the command line.
    fn apply(&self, params: &mut DealParameters) {
        let overrides = [
            (self.price, &mut params.purchase_price),
            (self.down, &mut params.down_payment_percent),
            (self.rate, &mut params.interest_rate_annual_percent),
            (self.rent, &mut params.monthly_gross_rent),
            (self.vacancy, &mut params.vacancy_rate_percent),
            (self.taxes, &mut params.annual_property_taxes),
            (self.insurance, &mut params.annual_insurance),
            (self.maintenance, &mut params.annual_maintenance),
            (self.rehab, &mut params.rehab_costs),
            (self.closing, &mut params.closing_costs),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }
        if let Some(term) = self.term {
            params.loan_term_years = term;
        }
    }
}

/// Arguments for deal analysis. Flags given alongside `--input` or piped
/// JSON override the corresponding input fields.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML analysis input
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML market benchmark
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Basic or extended metrics [default: basic]
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Grading table (defaults to the table implied by --mode)
    #[arg(long, value_enum)]
    pub scale: Option<ScaleArg>,

    /// Reject out-of-range parameters instead of clamping them
    #[arg(long)]
    pub strict: bool,

    /// Solve a discounted IRR over this many years instead of the proxy
    #[arg(long)]
    pub hold_years: Option<u32>,

    /// Estimate equity build from the amortization instead of the 30% heuristic
    #[arg(long)]
    pub amortized_equity: bool,

    #[command(flatten)]
    pub deal: DealFlags,
}

/// Arguments for the formatted results panel
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

fn build_input(args: &AnalyzeArgs) -> Result<DealAnalysisInput, Box<dyn std::error::Error>> {
    let mut deal_input: DealAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_config(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        DealAnalysisInput::new(DealParameters::default(), AnalysisMode::default())
    };

    apply_overrides(args, &mut deal_input)?;
    Ok(deal_input)
}

fn apply_overrides(
    args: &AnalyzeArgs,
    deal_input: &mut DealAnalysisInput,
) -> Result<(), Box<dyn std::error::Error>> {
    args.deal.apply(&mut deal_input.parameters);

    if let Some(mode) = args.mode {
        deal_input.mode = mode.into();
    }
    if args.strict {
        deal_input.parameter_policy = ParameterPolicy::Reject;
    }
    if let Some(years) = args.hold_years {
        deal_input.extended.irr_method = IrrMethod::Discounted {
            holding_period_years: years,
        };
    }
    if args.amortized_equity {
        deal_input.extended.equity_build_method = EquityBuildMethod::Amortized;
    }
    if let Some(ref path) = args.benchmark {
        let benchmark: MarketBenchmark = input::file::read_config(path)?;
        deal_input.benchmark = benchmark;
    }
    if let Some(scale) = args.scale {
        deal_input.grading_scale = Some(GradingScale::from(scale));
    }

    tracing::debug!(mode = ?deal_input.mode, policy = ?deal_input.parameter_policy, "analysis input ready");
    Ok(())
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input = build_input(&args)?;
    let result = analysis::analyze_deal(&deal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input = build_input(&args.analyze)?;
    let result = analysis::analyze_deal(&deal_input)?;
    let summary = format::summarize(&result.result);

    let mut value = serde_json::to_value(summary)?;
    if let Value::Object(ref mut map) = value {
        map.insert(
            "average_cap_rate".into(),
            Value::String(format::format_percentage(deal_input.benchmark.average_cap_rate)),
        );
        map.insert(
            "competitive_analysis".into(),
            Value::String(deal_input.benchmark.competitive_analysis.clone()),
        );
    }

    Ok(serde_json::json!({
        "result": value,
        "warnings": result.warnings,
        "methodology": result.methodology,
    }))
}
