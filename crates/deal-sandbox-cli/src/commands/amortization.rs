use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use deal_sandbox_core::amortization::payment::{self, loan_amount};
use deal_sandbox_core::format::format_currency;

/// Arguments for a standalone loan payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,

    /// Down payment as a percentage of price
    #[arg(long, default_value = "20")]
    pub down: Decimal,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub term: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let monthly_payment =
        payment::compute_monthly_payment(args.price, args.down, args.rate, args.term)?;
    let loan = loan_amount(args.price, args.down);
    let total_paid = monthly_payment
        .checked_mul(Decimal::from(u64::from(args.term) * 12))
        .ok_or("Total of payments exceeds the representable range")?;

    Ok(json!({
        "result": {
            "monthly_payment": monthly_payment.round_dp(2),
            "loan_amount": loan,
            "total_paid": total_paid.round_dp(2),
            "total_interest": (total_paid - loan).round_dp(2),
            "display": format_currency(monthly_payment),
        }
    }))
}
