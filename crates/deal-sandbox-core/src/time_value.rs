use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::DealSandboxError;
use crate::types::{Money, Rate};
use crate::DealSandboxResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const BISECTION_MAX_ITERATIONS: u32 = 200;
const IRR_FLOOR: Rate = dec!(-0.99);
const IRR_CEILING: Rate = dec!(10.0);

/// (1 + rate)^periods, or `None` when the factor leaves the decimal range.
pub fn compound_factor(rate: Rate, periods: u64) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powu(periods)
}

/// Net Present Value of a series of periodic cash flows (index 0 undiscounted)
pub fn npv(rate: Rate, cash_flows: &[Money]) -> DealSandboxResult<Money> {
    if rate <= dec!(-1) {
        return Err(DealSandboxError::InvalidParameter {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    npv_and_derivative(cash_flows, rate)
        .map(|(value, _)| value)
        .ok_or_else(|| DealSandboxError::overflow("NPV"))
}

/// Internal Rate of Return.
///
/// Newton-Raphson from `guess`; if that fails, bisection over
/// [-99%, 1000%]. Requires at least one sign change in `cash_flows`: a series
/// that is all inflows or all outflows has no rate at which NPV is zero.
pub fn irr(cash_flows: &[Money], guess: Rate) -> DealSandboxResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(DealSandboxError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let has_outflow = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    let has_inflow = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    if !(has_outflow && has_inflow) {
        return Err(DealSandboxError::InsufficientData(
            "IRR requires both an outflow and an inflow".into(),
        ));
    }

    match newton_irr(cash_flows, guess) {
        Ok(rate) => Ok(rate),
        Err(e) => {
            debug!(error = %e, "Newton-Raphson IRR failed; bisecting");
            bisection_irr(cash_flows, IRR_FLOOR, IRR_CEILING)
        }
    }
}

fn newton_irr(cash_flows: &[Money], guess: Rate) -> DealSandboxResult<Rate> {
    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate)
            .ok_or_else(|| DealSandboxError::overflow("IRR discounting"))?;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        let step = npv_val
            .checked_div(dnpv)
            .ok_or_else(|| DealSandboxError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            })?;

        let next = rate
            .checked_sub(step)
            .ok_or_else(|| DealSandboxError::overflow("IRR step"))?;
        if step.abs() < CONVERGENCE_THRESHOLD {
            return Ok(next);
        }

        // Guard against divergence
        rate = next.clamp(IRR_FLOOR, IRR_CEILING);
    }

    let last_delta = npv_and_derivative(cash_flows, rate)
        .map(|(value, _)| value)
        .unwrap_or(Decimal::MAX);
    Err(DealSandboxError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta,
    })
}

/// Bisection on the sign of [`scaled_npv`] within `[lo, hi]`.
fn bisection_irr(cash_flows: &[Money], mut lo: Rate, mut hi: Rate) -> DealSandboxResult<Rate> {
    let evaluate = |rate: Rate| {
        scaled_npv(cash_flows, rate).ok_or_else(|| DealSandboxError::overflow("IRR bisection"))
    };

    let mut f_lo = evaluate(lo)?;
    let f_hi = evaluate(hi)?;

    if f_lo.is_zero() {
        return Ok(lo);
    }
    if f_hi.is_zero() {
        return Ok(hi);
    }
    if f_lo.is_sign_negative() == f_hi.is_sign_negative() {
        return Err(DealSandboxError::ConvergenceFailure {
            function: "IRR bisection".into(),
            iterations: 0,
            last_delta: f_lo.abs().min(f_hi.abs()),
        });
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let f_mid = evaluate(mid)?;

        if f_mid.is_zero() || hi - lo < CONVERGENCE_THRESHOLD {
            return Ok(mid);
        }

        if f_mid.is_sign_negative() == f_lo.is_sign_negative() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(DealSandboxError::ConvergenceFailure {
        function: "IRR bisection".into(),
        iterations: BISECTION_MAX_ITERATIONS,
        last_delta: hi - lo,
    })
}

/// A quantity with the same sign and roots as NPV(rate) that stays bounded
/// across the bisection bracket: NPV itself for rate >= 0, future value
/// (NPV × (1+r)^n) below zero, where discounting would blow up.
fn scaled_npv(cash_flows: &[Money], rate: Rate) -> Option<Decimal> {
    if rate >= Decimal::ZERO {
        let discount = Decimal::ONE.checked_div(Decimal::ONE + rate)?;
        cash_flows
            .iter()
            .rev()
            .try_fold(Decimal::ZERO, |acc, cf| acc.checked_mul(discount)?.checked_add(*cf))
    } else {
        let growth = Decimal::ONE + rate;
        cash_flows
            .iter()
            .try_fold(Decimal::ZERO, |acc, cf| acc.checked_mul(growth)?.checked_add(*cf))
    }
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr, or `None` when
/// a term leaves the decimal range.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        let pv = cf.checked_mul(discount)?;
        npv = npv.checked_add(pv)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let term = Decimal::from(-(t as i64))
                .checked_mul(pv)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_add(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv, dnpv))
}
