use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DealSandboxError;
use crate::types::{DealParameters, Money, Percent};
use crate::DealSandboxResult;

/// Largest accepted money amount: one quadrillion.
pub const MAX_MONEY: Money = dec!(1000000000000000);

/// Largest accepted annual interest rate, in percent.
pub const MAX_INTEREST_RATE_PERCENT: Percent = dec!(1000);

/// What to do with out-of-domain parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterPolicy {
    /// Pull values back into range and record a warning for each one.
    #[default]
    Clamp,
    /// Return `InvalidParameter` for the first offending value.
    Reject,
}

/// Bring a deal into the engine's domain.
///
/// Money is bounded to `0..=MAX_MONEY`, percentages to `0..=100` and the
/// interest rate to `0..=MAX_INTEREST_RATE_PERCENT`. A zero loan term is
/// rejected under either policy: there is no term to clamp it to.
pub fn sanitize_parameters(
    params: &DealParameters,
    policy: ParameterPolicy,
    warnings: &mut Vec<String>,
) -> DealSandboxResult<DealParameters> {
    if params.loan_term_years == 0 {
        return Err(DealSandboxError::InvalidParameter {
            field: "loan_term_years".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }

    let mut clamp = Clamp { policy, warnings };

    Ok(DealParameters {
        purchase_price: clamp.money("purchase_price", params.purchase_price)?,
        down_payment_percent: clamp.percent("down_payment_percent", params.down_payment_percent)?,
        interest_rate_annual_percent: clamp
            .interest_rate("interest_rate_annual_percent", params.interest_rate_annual_percent)?,
        loan_term_years: params.loan_term_years,
        monthly_gross_rent: clamp.money("monthly_gross_rent", params.monthly_gross_rent)?,
        vacancy_rate_percent: clamp.percent("vacancy_rate_percent", params.vacancy_rate_percent)?,
        annual_property_taxes: clamp.money("annual_property_taxes", params.annual_property_taxes)?,
        annual_insurance: clamp.money("annual_insurance", params.annual_insurance)?,
        annual_maintenance: clamp.money("annual_maintenance", params.annual_maintenance)?,
        rehab_costs: clamp.money("rehab_costs", params.rehab_costs)?,
        closing_costs: clamp.money("closing_costs", params.closing_costs)?,
    })
}

struct Clamp<'a> {
    policy: ParameterPolicy,
    warnings: &'a mut Vec<String>,
}

impl Clamp<'_> {
    fn money(&mut self, field: &str, value: Money) -> DealSandboxResult<Money> {
        self.within(field, value, MAX_MONEY, "must be between 0 and 1e15")
    }

    fn percent(&mut self, field: &str, value: Percent) -> DealSandboxResult<Percent> {
        self.within(field, value, dec!(100), "must be between 0 and 100")
    }

    fn interest_rate(&mut self, field: &str, value: Percent) -> DealSandboxResult<Percent> {
        self.within(field, value, MAX_INTEREST_RATE_PERCENT, "must be between 0 and 1000")
    }

    fn within(
        &mut self,
        field: &str,
        value: Decimal,
        max: Decimal,
        reason: &str,
    ) -> DealSandboxResult<Decimal> {
        if value < Decimal::ZERO {
            self.adjust(field, value, Decimal::ZERO, reason)
        } else if value > max {
            self.adjust(field, value, max, reason)
        } else {
            Ok(value)
        }
    }

    fn adjust(
        &mut self,
        field: &str,
        value: Decimal,
        bound: Decimal,
        reason: &str,
    ) -> DealSandboxResult<Decimal> {
        match self.policy {
            ParameterPolicy::Reject => Err(DealSandboxError::InvalidParameter {
                field: field.into(),
                reason: format!("{reason} (got {value})"),
            }),
            ParameterPolicy::Clamp => {
                warn!(field, %value, %bound, "clamping out-of-range deal parameter");
                self.warnings
                    .push(format!("{field} {value} {reason}; clamped to {bound}"));
                Ok(bound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_parameters_pass_through() {
        let params = DealParameters::default();
        let mut warnings = Vec::new();
        let clean = sanitize_parameters(&params, ParameterPolicy::Clamp, &mut warnings).unwrap();
        assert_eq!(clean, params);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_clamp_percentages_and_money() {
        let params = DealParameters {
            down_payment_percent: dec!(130),
            vacancy_rate_percent: dec!(-5),
            monthly_gross_rent: dec!(-100),
            ..DealParameters::default()
        };
        let mut warnings = Vec::new();
        let clean = sanitize_parameters(&params, ParameterPolicy::Clamp, &mut warnings).unwrap();

        assert_eq!(clean.down_payment_percent, dec!(100));
        assert_eq!(clean.vacancy_rate_percent, Decimal::ZERO);
        assert_eq!(clean.monthly_gross_rent, Decimal::ZERO);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("down_payment_percent"));
    }

    #[test]
    fn test_reject_policy() {
        let params = DealParameters {
            interest_rate_annual_percent: dec!(-1),
            ..DealParameters::default()
        };
        let err = sanitize_parameters(&params, ParameterPolicy::Reject, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DealSandboxError::InvalidParameter { ref field, .. } if field == "interest_rate_annual_percent"
        ));
    }

    #[test]
    fn test_zero_term_rejected_even_when_clamping() {
        let params = DealParameters {
            loan_term_years: 0,
            ..DealParameters::default()
        };
        assert!(sanitize_parameters(&params, ParameterPolicy::Clamp, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_money_and_rate_capped() {
        let params = DealParameters {
            monthly_gross_rent: Decimal::MAX,
            purchase_price: dec!(1000000000000000000000000000),
            interest_rate_annual_percent: dec!(5000),
            ..DealParameters::default()
        };
        let mut warnings = Vec::new();
        let clean = sanitize_parameters(&params, ParameterPolicy::Clamp, &mut warnings).unwrap();

        assert_eq!(clean.monthly_gross_rent, MAX_MONEY);
        assert_eq!(clean.purchase_price, MAX_MONEY);
        assert_eq!(clean.interest_rate_annual_percent, MAX_INTEREST_RATE_PERCENT);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_reject_policy_refuses_oversized_money() {
        let params = DealParameters {
            annual_insurance: dec!(1000000000000001),
            ..DealParameters::default()
        };
        let err = sanitize_parameters(&params, ParameterPolicy::Reject, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DealSandboxError::InvalidParameter { ref field, .. } if field == "annual_insurance"
        ));
    }
}
