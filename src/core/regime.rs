use super::types::{Region, RegimeId};

/// Statutory base salary (lương cơ sở) the social/health cap is derived from.
pub const FIXED_BASE_SALARY: f64 = 2_340_000.0;
pub const CAP_MULTIPLIER: f64 = 20.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InsuranceRates {
    pub social: f64,
    pub health: f64,
    pub unemployment: f64,
}

pub const INSURANCE_RATES: InsuranceRates = InsuranceRates {
    social: 0.08,
    health: 0.015,
    unemployment: 0.01,
};

/// One row of a marginal-rate table. `upper_bound == None` is the open top
/// bracket. `cumulative_subtract` is chosen so that
/// `income * marginal_rate - cumulative_subtract` is the full progressive tax
/// for any income inside the bracket.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bracket {
    pub upper_bound: Option<f64>,
    pub marginal_rate: f64,
    pub cumulative_subtract: f64,
}

impl Bracket {
    pub fn contains(&self, taxable_income: f64) -> bool {
        self.upper_bound.is_none_or(|bound| taxable_income <= bound)
    }
}

const fn bracket(upper_bound: f64, marginal_rate: f64, cumulative_subtract: f64) -> Bracket {
    Bracket {
        upper_bound: Some(upper_bound),
        marginal_rate,
        cumulative_subtract,
    }
}

const fn top_bracket(marginal_rate: f64, cumulative_subtract: f64) -> Bracket {
    Bracket {
        upper_bound: None,
        marginal_rate,
        cumulative_subtract,
    }
}

const SEVEN_BRACKETS: [Bracket; 7] = [
    bracket(5_000_000.0, 0.05, 0.0),
    bracket(10_000_000.0, 0.10, 250_000.0),
    bracket(18_000_000.0, 0.15, 750_000.0),
    bracket(32_000_000.0, 0.20, 1_650_000.0),
    bracket(52_000_000.0, 0.25, 3_250_000.0),
    bracket(80_000_000.0, 0.30, 5_850_000.0),
    top_bracket(0.35, 9_850_000.0),
];

const FIVE_BRACKETS: [Bracket; 5] = [
    bracket(10_000_000.0, 0.05, 0.0),
    bracket(30_000_000.0, 0.10, 500_000.0),
    bracket(60_000_000.0, 0.20, 3_500_000.0),
    bracket(100_000_000.0, 0.30, 9_500_000.0),
    top_bracket(0.35, 14_500_000.0),
];

/// Regional minimum wages, indexed by region I..IV.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinWageTable {
    pub wages: [f64; 4],
}

impl MinWageTable {
    pub fn wage(&self, region: Region) -> f64 {
        self.wages[region.index()]
    }
}

const MIN_WAGE_2025: MinWageTable = MinWageTable {
    wages: [4_960_000.0, 4_410_000.0, 3_860_000.0, 3_250_000.0],
};

const MIN_WAGE_2026: MinWageTable = MinWageTable {
    wages: [5_310_000.0, 4_730_000.0, 4_140_000.0, 3_700_000.0],
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegimeConfig {
    pub id: RegimeId,
    pub label: &'static str,
    pub note: Option<&'static str>,
    pub personal_deduction: f64,
    pub dependent_deduction: f64,
    pub brackets: &'static [Bracket],
    pub min_wages: &'static MinWageTable,
}

impl RegimeConfig {
    pub fn total_deduction(&self, dependents: u32) -> f64 {
        self.personal_deduction + f64::from(dependents) * self.dependent_deduction
    }

    pub fn regional_min_wage(&self, region: Region) -> f64 {
        self.min_wages.wage(region)
    }

    pub fn unemployment_cap(&self, region: Region) -> f64 {
        CAP_MULTIPLIER * self.regional_min_wage(region)
    }
}

pub fn social_health_cap() -> f64 {
    CAP_MULTIPLIER * FIXED_BASE_SALARY
}

static REGIMES: [RegimeConfig; 3] = [
    RegimeConfig {
        id: RegimeId::Current2025,
        label: "Hiện hành (2025)",
        note: None,
        personal_deduction: 11_000_000.0,
        dependent_deduction: 4_400_000.0,
        brackets: &SEVEN_BRACKETS,
        min_wages: &MIN_WAGE_2025,
    },
    RegimeConfig {
        id: RegimeId::Draft2026FirstHalf,
        label: "Trước 1/7/2026",
        note: Some("Áp dụng trước 1/7/2026: Giảm trừ mới, biểu thuế 7 bậc cũ"),
        personal_deduction: 15_500_000.0,
        dependent_deduction: 6_200_000.0,
        brackets: &SEVEN_BRACKETS,
        min_wages: &MIN_WAGE_2026,
    },
    RegimeConfig {
        id: RegimeId::Draft2026SecondHalf,
        label: "Từ 1/7/2026",
        note: Some("Áp dụng từ 1/7/2026: Giảm trừ mới + biểu thuế 5 bậc mới"),
        personal_deduction: 15_500_000.0,
        dependent_deduction: 6_200_000.0,
        brackets: &FIVE_BRACKETS,
        min_wages: &MIN_WAGE_2026,
    },
];

pub fn list_regimes() -> &'static [RegimeId] {
    &RegimeId::ALL
}

pub fn regime_config(id: RegimeId) -> &'static RegimeConfig {
    match id {
        RegimeId::Current2025 => &REGIMES[0],
        RegimeId::Draft2026FirstHalf => &REGIMES[1],
        RegimeId::Draft2026SecondHalf => &REGIMES[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progressive_tax_at(brackets: &[Bracket], income: f64) -> f64 {
        let mut tax = 0.0;
        let mut previous = 0.0;
        for b in brackets {
            let top = b.upper_bound.unwrap_or(f64::INFINITY);
            if income > previous {
                tax += (income.min(top) - previous) * b.marginal_rate;
            }
            previous = top;
        }
        tax
    }

    #[test]
    fn lookup_returns_matching_config_for_every_regime() {
        for id in list_regimes() {
            assert_eq!(regime_config(*id).id, *id);
        }
        assert_eq!(list_regimes().len(), 3);
        assert_eq!(list_regimes()[0], RegimeId::Current2025);
    }

    #[test]
    fn bracket_tables_are_strictly_increasing_and_open_ended() {
        for id in list_regimes() {
            let brackets = regime_config(*id).brackets;
            let (last, bounded) = brackets.split_last().expect("non-empty table");
            assert!(last.upper_bound.is_none());
            let mut previous = 0.0;
            for b in bounded {
                let bound = b.upper_bound.expect("only the last bracket is open");
                assert!(bound > previous);
                previous = bound;
            }
        }
    }

    #[test]
    fn subtract_constants_match_cumulative_tax_at_each_boundary() {
        for id in list_regimes() {
            let brackets = regime_config(*id).brackets;
            for b in brackets.iter().filter(|b| b.upper_bound.is_some()) {
                let bound = b.upper_bound.unwrap_or_default();
                let quick = bound * b.marginal_rate - b.cumulative_subtract;
                let slow = progressive_tax_at(brackets, bound);
                assert!(
                    (quick - slow).abs() < 1e-6,
                    "{id}: bound {bound} quick {quick} slow {slow}"
                );
            }
        }
    }

    #[test]
    fn deductions_and_min_wages_follow_the_period() {
        let current = regime_config(RegimeId::Current2025);
        assert_eq!(current.total_deduction(2), 11_000_000.0 + 2.0 * 4_400_000.0);
        assert_eq!(current.regional_min_wage(Region::One), 4_960_000.0);

        let h1 = regime_config(RegimeId::Draft2026FirstHalf);
        let h2 = regime_config(RegimeId::Draft2026SecondHalf);
        assert_eq!(h1.personal_deduction, h2.personal_deduction);
        assert_eq!(h1.brackets.len(), 7);
        assert_eq!(h2.brackets.len(), 5);
        assert_eq!(h2.unemployment_cap(Region::Four), 20.0 * 3_700_000.0);
        assert_eq!(social_health_cap(), 46_800_000.0);
    }
}
