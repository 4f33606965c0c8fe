use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DealSandboxError;
use crate::time_value::compound_factor;
use crate::types::{Money, Percent, Rate};
use crate::DealSandboxResult;

/// Financed portion of the purchase price, between zero and the price itself.
/// A down payment of 100% or more leaves nothing to borrow.
pub fn loan_amount(purchase_price: Money, down_payment_percent: Percent) -> Money {
    let financed_share = (Decimal::ONE - down_payment_percent / dec!(100))
        .clamp(Decimal::ZERO, Decimal::ONE);
    (purchase_price * financed_share).max(Decimal::ZERO)
}

/// Nominal annual percentage rate to a monthly periodic rate.
pub fn monthly_rate(interest_rate_annual_percent: Percent) -> Rate {
    interest_rate_annual_percent / dec!(100) / dec!(12)
}

/// Monthly debt service on a fixed-rate, fully amortizing loan.
///
/// The loan is `purchase_price × (1 − down_payment_percent / 100)`, repaid in
/// `loan_term_years × 12` equal payments.
pub fn compute_monthly_payment(
    purchase_price: Money,
    down_payment_percent: Percent,
    interest_rate_annual_percent: Percent,
    loan_term_years: u32,
) -> DealSandboxResult<Money> {
    if loan_term_years == 0 {
        return Err(DealSandboxError::InvalidParameter {
            field: "loan_term_years".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }
    if purchase_price < Decimal::ZERO {
        return Err(DealSandboxError::InvalidParameter {
            field: "purchase_price".into(),
            reason: "Purchase price cannot be negative".into(),
        });
    }
    if interest_rate_annual_percent < Decimal::ZERO {
        return Err(DealSandboxError::InvalidParameter {
            field: "interest_rate_annual_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let principal = loan_amount(purchase_price, down_payment_percent);
    let total_months = u64::from(loan_term_years) * 12;

    amortizing_payment(
        principal,
        monthly_rate(interest_rate_annual_percent),
        total_months,
    )
}

/// Standard fixed-rate payment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn amortizing_payment(
    principal: Money,
    monthly_rate: Rate,
    total_months: u64,
) -> DealSandboxResult<Money> {
    if total_months == 0 {
        return Err(DealSandboxError::DivisionByZero {
            context: "monthly payment over zero months".into(),
        });
    }
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let straight_line = principal / Decimal::from(total_months);
    if monthly_rate.is_zero() {
        return Ok(straight_line);
    }

    let compound = match compound_factor(monthly_rate, total_months) {
        Some(c) => c,
        // (1+r)^n beyond the decimal range: the annuity factor has converged
        // to 1, leaving interest-only debt service.
        None => {
            return principal
                .checked_mul(monthly_rate)
                .ok_or_else(|| DealSandboxError::overflow("interest-only payment"))
        }
    };

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register over the term.
        return Ok(straight_line);
    }

    compound
        .checked_div(denominator)
        .and_then(|annuity| principal.checked_mul(monthly_rate)?.checked_mul(annuity))
        .ok_or_else(|| DealSandboxError::overflow("monthly payment"))
}
