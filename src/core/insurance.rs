use super::regime::{INSURANCE_RATES, RegimeConfig, social_health_cap};
use super::types::Region;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InsuranceContributions {
    pub social: f64,
    pub health: f64,
    pub unemployment: f64,
}

impl InsuranceContributions {
    pub fn total(self) -> f64 {
        self.social + self.health + self.unemployment
    }
}

/// Employee-side mandatory contributions. Social and health share the
/// base-salary cap; unemployment is capped by the regional minimum wage of
/// the regime's period.
pub fn compute_insurance(
    insurance_salary: f64,
    region: Region,
    regime: &RegimeConfig,
) -> InsuranceContributions {
    let base = insurance_salary.max(0.0);
    let capped_social_health = base.min(social_health_cap());
    let capped_unemployment = base.min(regime.unemployment_cap(region));

    InsuranceContributions {
        social: capped_social_health * INSURANCE_RATES.social,
        health: capped_social_health * INSURANCE_RATES.health,
        unemployment: capped_unemployment * INSURANCE_RATES.unemployment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::regime::regime_config;
    use crate::core::types::RegimeId;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn below_both_caps_applies_flat_rates() {
        let regime = regime_config(RegimeId::Current2025);
        let ins = compute_insurance(20_000_000.0, Region::One, regime);
        assert_approx(ins.social, 1_600_000.0);
        assert_approx(ins.health, 300_000.0);
        assert_approx(ins.unemployment, 200_000.0);
        assert_approx(ins.total(), 2_100_000.0);
    }

    #[test]
    fn social_and_health_stop_at_twenty_base_salaries() {
        let regime = regime_config(RegimeId::Current2025);
        let ins = compute_insurance(60_000_000.0, Region::One, regime);
        assert_approx(ins.social, 46_800_000.0 * 0.08);
        assert_approx(ins.health, 46_800_000.0 * 0.015);
        // 60M is still under the region I unemployment cap (99.2M).
        assert_approx(ins.unemployment, 600_000.0);
    }

    #[test]
    fn unemployment_cap_depends_on_region_and_period() {
        let salary = 150_000_000.0;
        let current = regime_config(RegimeId::Current2025);
        let draft = regime_config(RegimeId::Draft2026SecondHalf);

        assert_approx(
            compute_insurance(salary, Region::One, current).unemployment,
            20.0 * 4_960_000.0 * 0.01,
        );
        assert_approx(
            compute_insurance(salary, Region::Four, current).unemployment,
            20.0 * 3_250_000.0 * 0.01,
        );
        assert_approx(
            compute_insurance(salary, Region::One, draft).unemployment,
            20.0 * 5_310_000.0 * 0.01,
        );
    }

    #[test]
    fn negative_base_contributes_nothing() {
        let regime = regime_config(RegimeId::Current2025);
        let ins = compute_insurance(-5.0, Region::Two, regime);
        assert_eq!(ins, InsuranceContributions::default());
    }
}
