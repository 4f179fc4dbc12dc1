use super::regime::RegimeConfig;
use super::types::BracketContribution;

/// Total PIT via the quick-calculation form: locate the bracket holding the
/// income and apply `income * rate - subtract`.
pub fn compute_pit(taxable_income: f64, regime: &RegimeConfig) -> f64 {
    if taxable_income <= 0.0 {
        return 0.0;
    }

    regime
        .brackets
        .iter()
        .find(|bracket| bracket.contains(taxable_income))
        .map(|bracket| taxable_income * bracket.marginal_rate - bracket.cumulative_subtract)
        .unwrap_or(0.0)
}

/// Per-bracket slices of `taxable_income`, each taxed at its own marginal
/// rate. Empty slices are skipped; the slice taxes sum to `compute_pit`.
pub fn compute_breakdown(taxable_income: f64, regime: &RegimeConfig) -> Vec<BracketContribution> {
    let mut breakdown = Vec::new();
    if taxable_income <= 0.0 {
        return breakdown;
    }

    let mut previous_bound = 0.0;
    for (i, bracket) in regime.brackets.iter().enumerate() {
        let current_bound = bracket.upper_bound.unwrap_or(f64::INFINITY);
        if taxable_income > previous_bound {
            let income = taxable_income.min(current_bound) - previous_bound;
            if income > 0.0 {
                breakdown.push(BracketContribution {
                    level: i + 1,
                    rate: bracket.marginal_rate,
                    upper_bound: bracket.upper_bound,
                    income,
                    tax: income * bracket.marginal_rate,
                });
            }
        }

        previous_bound = current_bound;
        if taxable_income <= previous_bound {
            break;
        }
    }

    breakdown
}
