//! Extended internal rate of return for irregular cash flows.
//!
//! Newton-Raphson on the NPV function with a bisection fallback. The hot
//! loop runs in `f64`: the iteration clamp allows rates up to 10, and
//! `(1 + 10)^t` at multi-decade day-count exponents is far outside
//! `Decimal` range. Monetary inputs stay `Decimal` at the API edge.

use rust_decimal::prelude::ToPrimitive;

use super::CashFlow;
use crate::constants::DAYS_PER_YEAR;

/// Lower clamp applied to the rate during iteration.
const RATE_FLOOR: f64 = -0.9;
/// Upper clamp applied to the rate during iteration.
const RATE_CEIL: f64 = 10.0;
/// A final result outside this window is rejected as divergence.
const ACCEPT_MIN: f64 = -0.99;
const ACCEPT_MAX: f64 = 100.0;
/// Derivative magnitude below which Newton would effectively divide by zero.
const DERIVATIVE_EPSILON: f64 = 1e-10;
/// Maximum bisection steps after Newton-Raphson gives up.
const BISECTION_STEPS: u32 = 200;
/// NPV magnitude at which bisection accepts the midpoint as a root.
const BISECTION_NPV_TOLERANCE: f64 = 1e-5;

/// Tuning knobs for the solver. The defaults match the dashboard's use.
#[derive(Debug, Clone, Copy)]
pub struct XirrParams {
    pub guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for XirrParams {
    fn default() -> Self {
        Self {
            guess: 0.10,
            tolerance: 1e-7,
            max_iterations: 100,
        }
    }
}

/// Solves for the annualized rate of return with default parameters.
///
/// Returns `None` — never panics, never errors — when the flow set is
/// unpriceable: fewer than two flows, no sign diversity, or numerical
/// divergence that bisection cannot recover. Callers must treat `None` as
/// "insufficient data", which is not the same as a computed 0% return.
pub fn xirr(cash_flows: &[CashFlow]) -> Option<f64> {
    xirr_with(cash_flows, XirrParams::default())
}

/// Solves for the annualized rate of return (0.15 = 15%).
pub fn xirr_with(cash_flows: &[CashFlow], params: XirrParams) -> Option<f64> {
    if cash_flows.len() < 2 {
        return None;
    }

    let has_positive = cash_flows.iter().any(|f| f.amount.is_sign_positive() && !f.amount.is_zero());
    let has_negative = cash_flows.iter().any(|f| f.amount.is_sign_negative());
    if !has_positive || !has_negative {
        return None;
    }

    let base_date = cash_flows.iter().map(|f| f.date).min()?;

    // (amount, years since earliest flow) pairs, actual/365.25 day count.
    let flows: Vec<(f64, f64)> = cash_flows
        .iter()
        .map(|f| {
            let amount = f.amount.to_f64().unwrap_or(0.0);
            let years = (f.date - base_date).num_days() as f64 / DAYS_PER_YEAR;
            (amount, years)
        })
        .collect();

    newton_raphson(&flows, params).or_else(|| bisection(&flows))
}

fn npv(flows: &[(f64, f64)], rate: f64) -> f64 {
    flows
        .iter()
        .map(|&(amount, years)| amount / (1.0 + rate).powf(years))
        .sum()
}

fn npv_derivative(flows: &[(f64, f64)], rate: f64) -> f64 {
    flows
        .iter()
        .map(|&(amount, years)| -amount * years / (1.0 + rate).powf(years + 1.0))
        .sum()
}

fn accept(rate: f64) -> Option<f64> {
    if rate.is_finite() && (ACCEPT_MIN..=ACCEPT_MAX).contains(&rate) {
        Some(rate)
    } else {
        None
    }
}

fn newton_raphson(flows: &[(f64, f64)], params: XirrParams) -> Option<f64> {
    let mut rate = params.guess;

    for _ in 0..params.max_iterations {
        let value = npv(flows, rate);
        let derivative = npv_derivative(flows, rate);

        if derivative.abs() < DERIVATIVE_EPSILON {
            // A flat spot would blow up the update step; nudge off it.
            rate += 0.1;
            continue;
        }

        let next = (rate - value / derivative).clamp(RATE_FLOOR, RATE_CEIL);
        if (next - rate).abs() < params.tolerance {
            return accept(next);
        }
        rate = next;
    }

    None
}

/// Guaranteed to converge within the bracket if a root exists there, at the
/// cost of many more NPV evaluations than Newton needs on friendly inputs.
fn bisection(flows: &[(f64, f64)]) -> Option<f64> {
    let mut lo = RATE_FLOOR;
    let mut hi = RATE_CEIL;
    let mut npv_lo = npv(flows, lo);
    let npv_hi = npv(flows, hi);

    if npv_lo * npv_hi > 0.0 {
        // No sign change: the root (if any) is outside the bracket.
        return None;
    }

    for _ in 0..BISECTION_STEPS {
        let mid = (lo + hi) / 2.0;
        let npv_mid = npv(flows, mid);

        if npv_mid.abs() < BISECTION_NPV_TOLERANCE {
            return accept(mid);
        }

        if npv_lo * npv_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = npv_mid;
        }
    }

    None
}
