use tracing::{trace, warn};

use super::engine::gross_to_net;
use super::regime::RegimeConfig;
use super::types::{CalculationInput, CalculationResult};

/// Results whose net lands within this many units of the target are reported
/// with the target as their net, absorbing residual bisection error.
pub const SNAP_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub search_ceiling: f64,
    pub snap_tolerance: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            max_iterations: 100,
            search_ceiling: 1e10,
            snap_tolerance: SNAP_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOutcome {
    pub result: CalculationResult,
    pub iterations: u32,
    pub converged: bool,
    pub hit_ceiling: bool,
}

pub fn compute_net_to_gross(input: &CalculationInput, regime: &RegimeConfig) -> CalculationResult {
    solve_net_to_gross(input, regime, SolveConfig::default()).result
}

/// Finds the gross salary whose net equals `input.amount`. Net is monotone in
/// gross but has no closed-form inverse once the insurance caps and bracket
/// edges are involved, so the gross is bracketed by doubling and then
/// bisected.
pub fn solve_net_to_gross(
    input: &CalculationInput,
    regime: &RegimeConfig,
    config: SolveConfig,
) -> SolveOutcome {
    let target = input.amount;
    let evaluate = |gross: f64| {
        gross_to_net(
            gross,
            input.dependents,
            input.region,
            input.insurance_base,
            regime,
        )
    };

    if !target.is_finite() || target <= 0.0 {
        return SolveOutcome {
            result: CalculationResult::default(),
            iterations: 0,
            converged: true,
            hit_ceiling: false,
        };
    }

    let mut lo = target;
    let mut hi = target * 2.0;
    let mut hit_ceiling = false;
    loop {
        if evaluate(hi).net > target {
            break;
        }
        lo = hi;
        hi *= 2.0;
        if hi > config.search_ceiling {
            hit_ceiling = true;
            break;
        }
    }

    let mut result = evaluate(lo);
    let mut converged = false;
    let mut it = 0;
    while it < config.max_iterations {
        it += 1;
        let mid = (lo + hi) * 0.5;
        result = evaluate(mid);
        trace!(
            iteration = it,
            lo,
            hi,
            mid,
            net = result.net,
            "net-to-gross bisection"
        );

        if (result.net - target).abs() < config.tolerance {
            converged = true;
            break;
        }
        if result.net < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    if hit_ceiling {
        warn!(
            target_net = target,
            ceiling = hi,
            "net target beyond search ceiling; returning best estimate"
        );
    } else if !converged {
        warn!(target_net = target, iterations = it, "net-to-gross search did not converge");
    }

    if (result.net - target).abs() < config.snap_tolerance {
        result.net = target;
    }

    SolveOutcome {
        result,
        iterations: it,
        converged,
        hit_ceiling,
    }
}
