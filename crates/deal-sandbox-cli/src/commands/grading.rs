use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use deal_sandbox_core::grading::classifier::{self, GradingScale};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScaleArg {
    Institutional,
    Basic,
}

impl From<ScaleArg> for GradingScale {
    fn from(scale: ScaleArg) -> Self {
        match scale {
            ScaleArg::Institutional => GradingScale::Institutional,
            ScaleArg::Basic => GradingScale::Basic,
        }
    }
}

/// Arguments for grading a cash-on-cash return
#[derive(Args)]
pub struct GradeArgs {
    /// Cash-on-cash return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub coc: Decimal,

    /// Grading table
    #[arg(long, value_enum, default_value = "institutional")]
    pub scale: ScaleArg,
}

pub fn run_grade(args: GradeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let grade = classifier::grade_deal(args.coc, args.scale.into());
    Ok(serde_json::json!({ "result": grade }))
}
