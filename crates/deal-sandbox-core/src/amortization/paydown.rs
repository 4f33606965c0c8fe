use rust_decimal::Decimal;

use crate::amortization::payment::amortizing_payment;
use crate::types::{Money, Rate};
use crate::DealSandboxResult;

/// Outstanding balance after `payments_made` level payments.
///
/// Rolls the balance forward one month at a time; only the closing balance is
/// kept.
pub fn remaining_balance(
    principal: Money,
    monthly_rate: Rate,
    total_months: u64,
    payments_made: u64,
) -> DealSandboxResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if payments_made >= total_months {
        return Ok(Decimal::ZERO);
    }

    if monthly_rate.is_zero() {
        // payments_made < total_months, so the share stays below one
        let paid = principal * (Decimal::from(payments_made) / Decimal::from(total_months));
        return Ok(principal - paid);
    }

    let payment = amortizing_payment(principal, monthly_rate, total_months)?;

    let mut balance = principal;
    for _ in 0..payments_made {
        let interest = balance * monthly_rate;
        balance -= payment - interest;
        if balance <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
    }

    Ok(balance)
}

/// Principal repaid over the first `payments_made` payments.
pub fn principal_paid(
    principal: Money,
    monthly_rate: Rate,
    total_months: u64,
    payments_made: u64,
) -> DealSandboxResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let balance = remaining_balance(principal, monthly_rate, total_months, payments_made)?;
    Ok(principal - balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::payment::monthly_rate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_declines() {
        let r = monthly_rate(dec!(6.5));
        let after_1y = remaining_balance(dec!(200000), r, 360, 12).unwrap();
        let after_10y = remaining_balance(dec!(200000), r, 360, 120).unwrap();
        assert!(after_1y < dec!(200000));
        assert!(after_10y < after_1y);
    }

    #[test]
    fn test_first_year_principal_on_30y_loan() {
        // $200k at 6.5%: year-one principal is roughly $2,235
        let r = monthly_rate(dec!(6.5));
        let paid = principal_paid(dec!(200000), r, 360, 12).unwrap();
        assert!(
            paid > dec!(2200) && paid < dec!(2270),
            "Expected ~2235, got {paid}"
        );
    }

    #[test]
    fn test_fully_repaid_at_term() {
        let r = monthly_rate(dec!(6.5));
        assert_eq!(remaining_balance(dec!(200000), r, 360, 360).unwrap(), Decimal::ZERO);
        assert_eq!(remaining_balance(dec!(200000), r, 360, 500).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let paid = principal_paid(dec!(120000), Decimal::ZERO, 120, 12).unwrap();
        assert_eq!(paid, dec!(12000));
    }

    #[test]
    fn test_no_loan_no_paydown() {
        let r = monthly_rate(dec!(6.5));
        assert_eq!(principal_paid(Decimal::ZERO, r, 360, 12).unwrap(), Decimal::ZERO);
    }
}
