use super::insurance::compute_insurance;
use super::regime::{RegimeConfig, list_regimes, regime_config};
use super::solver::compute_net_to_gross;
use super::tax::compute_pit;
use super::types::{
    CalculationInput, CalculationResult, Comparison, Direction, InsuranceBase, Region,
    RegimeOutcome,
};

pub fn compute_gross_to_net(input: &CalculationInput, regime: &RegimeConfig) -> CalculationResult {
    gross_to_net(
        input.amount,
        input.dependents,
        input.region,
        input.insurance_base,
        regime,
    )
}

pub(crate) fn gross_to_net(
    gross: f64,
    dependents: u32,
    region: Region,
    insurance_base: InsuranceBase,
    regime: &RegimeConfig,
) -> CalculationResult {
    // No income, no result: a declared insurance base is not charged either.
    if !gross.is_finite() || gross <= 0.0 {
        return CalculationResult::default();
    }

    let insurance = compute_insurance(insurance_base.resolve(gross), region, regime);
    let total_insurance = insurance.total();

    let pre_tax_income = gross - total_insurance;
    let total_deduction = regime.total_deduction(dependents);
    let taxable_income = (pre_tax_income - total_deduction).max(0.0);
    let pit = compute_pit(taxable_income, regime);

    CalculationResult {
        gross,
        net: gross - total_insurance - pit,
        social_ins: insurance.social,
        health_ins: insurance.health,
        unemployment_ins: insurance.unemployment,
        pre_tax_income,
        total_deduction,
        taxable_income,
        pit,
    }
}

/// Runs the input in its own direction.
pub fn compute(input: &CalculationInput, regime: &RegimeConfig) -> CalculationResult {
    match input.direction {
        Direction::GrossToNet => compute_gross_to_net(input, regime),
        Direction::NetToGross => compute_net_to_gross(input, regime),
    }
}

/// Same input under every regime. Differences are taken against the first
/// listed regime (current law).
pub fn compare_regimes(input: &CalculationInput) -> Comparison {
    let results: Vec<_> = list_regimes()
        .iter()
        .map(|id| (*id, compute(input, regime_config(*id))))
        .collect();

    let baseline = results.first().map(|(_, r)| *r).unwrap_or_default();
    let outcomes = results
        .into_iter()
        .map(|(regime, result)| RegimeOutcome {
            regime,
            result,
            net_diff_vs_baseline: result.net - baseline.net,
            pit_diff_vs_baseline: result.pit - baseline.pit,
        })
        .collect();

    Comparison {
        direction: input.direction,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::regime::{INSURANCE_RATES, social_health_cap};
    use crate::core::types::RegimeId;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_input(amount: f64) -> CalculationInput {
        CalculationInput {
            amount,
            direction: Direction::GrossToNet,
            dependents: 0,
            region: Region::One,
            insurance_base: InsuranceBase::OnGrossSalary,
        }
    }

    fn assert_result_invariants(r: &CalculationResult) {
        assert_approx(r.net, r.gross - r.total_insurance() - r.pit);
        assert_approx(r.pre_tax_income, r.gross - r.total_insurance());
        assert_approx(
            r.taxable_income,
            (r.pre_tax_income - r.total_deduction).max(0.0),
        );
    }

    #[test]
    fn twenty_million_gross_under_current_law() {
        let regime = regime_config(RegimeId::Current2025);
        let r = compute_gross_to_net(&sample_input(20_000_000.0), regime);

        assert_approx(r.total_insurance(), 2_100_000.0);
        assert_approx(r.pre_tax_income, 17_900_000.0);
        assert_approx(r.total_deduction, 11_000_000.0);
        assert_approx(r.taxable_income, 6_900_000.0);
        assert_approx(r.pit, 440_000.0);
        assert_approx(r.net, 17_460_000.0);
        assert_result_invariants(&r);
    }

    #[test]
    fn dependents_raise_the_deduction() {
        let regime = regime_config(RegimeId::Current2025);
        let mut input = sample_input(30_000_000.0);
        input.dependents = 2;
        let r = compute_gross_to_net(&input, regime);
        assert_approx(r.total_deduction, 19_800_000.0);
        // 30M - 3.15M insurance - 19.8M deduction
        assert_approx(r.taxable_income, 7_050_000.0);
        assert_approx(r.pit, 455_000.0);
    }

    #[test]
    fn zero_gross_yields_zero_result() {
        let regime = regime_config(RegimeId::Current2025);
        let r = compute_gross_to_net(&sample_input(0.0), regime);
        assert_eq!(r.pit, 0.0);
        assert_eq!(r.net, 0.0);
        assert_eq!(r.taxable_income, 0.0);
    }

    #[test]
    fn zero_gross_with_declared_insurance_salary_is_still_zero() {
        let regime = regime_config(RegimeId::Current2025);
        let mut input = sample_input(0.0);
        input.insurance_base = InsuranceBase::OnOtherAmount(10_000_000.0);
        let r = compute_gross_to_net(&input, regime);
        assert_eq!(r, CalculationResult::default());

        input.amount = -3_000_000.0;
        assert_eq!(compute_gross_to_net(&input, regime), CalculationResult::default());
    }

    #[test]
    fn declared_insurance_salary_replaces_gross_base() {
        let regime = regime_config(RegimeId::Current2025);
        let mut input = sample_input(30_000_000.0);
        input.insurance_base = InsuranceBase::OnOtherAmount(10_000_000.0);
        let r = compute_gross_to_net(&input, regime);
        assert_approx(r.social_ins, 800_000.0);
        assert_approx(r.health_ins, 150_000.0);
        assert_approx(r.unemployment_ins, 100_000.0);
        assert_result_invariants(&r);

        input.insurance_base = InsuranceBase::OnOtherAmount(0.0);
        let fallback = compute_gross_to_net(&input, regime);
        assert_approx(fallback.social_ins, 2_400_000.0);
    }

    #[test]
    fn comparison_keeps_gross_fixed_and_reports_differences() {
        let comparison = compare_regimes(&sample_input(20_000_000.0));
        assert_eq!(comparison.outcomes.len(), 3);
        assert_eq!(comparison.outcomes[0].regime, RegimeId::Current2025);
        assert_approx(comparison.outcomes[0].net_diff_vs_baseline, 0.0);

        for outcome in &comparison.outcomes {
            assert_approx(outcome.result.gross, 20_000_000.0);
            assert_result_invariants(&outcome.result);
        }

        // Both 2026 regimes: taxable 20M - 2.1M - 15.5M = 2.4M at 5%.
        let h2 = &comparison.outcomes[2];
        assert_approx(h2.result.pit, 120_000.0);
        assert_approx(h2.net_diff_vs_baseline, 320_000.0);
        assert_approx(h2.pit_diff_vs_baseline, -320_000.0);
    }

    #[test]
    fn comparison_runs_net_to_gross_when_asked() {
        let mut input = sample_input(17_460_000.0);
        input.direction = Direction::NetToGross;
        let comparison = compare_regimes(&input);
        assert_eq!(comparison.direction, Direction::NetToGross);
        assert!((comparison.outcomes[0].result.gross - 20_000_000.0).abs() <= 2.0);
        for outcome in &comparison.outcomes {
            assert_eq!(outcome.result.net, 17_460_000.0);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_net_is_non_decreasing_in_gross(
            gross in 0u64..400_000_000,
            step in 1u64..5_000_000,
            dependents in 0u32..5,
            region in 1u8..5,
            regime_index in 0usize..3
        ) {
            let regime = regime_config(list_regimes()[regime_index]);
            let mut input = sample_input(gross as f64);
            input.dependents = dependents;
            input.region = Region::try_from(region).expect("valid region");
            let low = compute_gross_to_net(&input, regime);
            input.amount = (gross + step) as f64;
            let high = compute_gross_to_net(&input, regime);
            prop_assert!(high.net + 1e-6 >= low.net);
        }

        #[test]
        fn prop_social_and_health_are_flat_above_the_cap(
            extra in 0u64..1_000_000_000,
            regime_index in 0usize..3
        ) {
            let regime = regime_config(list_regimes()[regime_index]);
            let cap = social_health_cap();
            let r = compute_gross_to_net(&sample_input(cap + extra as f64), regime);
            let expected = cap * (INSURANCE_RATES.social + INSURANCE_RATES.health);
            prop_assert!((r.social_ins + r.health_ins - expected).abs() < 1e-6);
        }
    }
}
