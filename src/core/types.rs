use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InputError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RegimeId {
    #[serde(rename = "2025")]
    Current2025,
    #[serde(rename = "2026-h1")]
    Draft2026FirstHalf,
    #[serde(rename = "2026-h2")]
    Draft2026SecondHalf,
}

impl RegimeId {
    pub const ALL: [RegimeId; 3] = [
        RegimeId::Current2025,
        RegimeId::Draft2026FirstHalf,
        RegimeId::Draft2026SecondHalf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegimeId::Current2025 => "2025",
            RegimeId::Draft2026FirstHalf => "2026-h1",
            RegimeId::Draft2026SecondHalf => "2026-h2",
        }
    }
}

impl fmt::Display for RegimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegimeId {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2025" => Ok(RegimeId::Current2025),
            "2026-h1" | "2026h1" => Ok(RegimeId::Draft2026FirstHalf),
            "2026-h2" | "2026h2" => Ok(RegimeId::Draft2026SecondHalf),
            other => Err(InputError::UnknownRegime(other.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    GrossToNet,
    NetToGross,
}

impl FromStr for Direction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gross-to-net" | "gross-net" | "grossToNet" => Ok(Direction::GrossToNet),
            "net-to-gross" | "net-gross" | "netToGross" => Ok(Direction::NetToGross),
            other => Err(InputError::InvalidDirection(other.to_string())),
        }
    }
}

/// Minimum-wage region (Vùng I..IV). Serialized as its number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Region {
    One,
    Two,
    Three,
    Four,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::One, Region::Two, Region::Three, Region::Four];

    pub fn number(self) -> u8 {
        match self {
            Region::One => 1,
            Region::Two => 2,
            Region::Three => 3,
            Region::Four => 4,
        }
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl TryFrom<u8> for Region {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Region::One),
            2 => Ok(Region::Two),
            3 => Ok(Region::Three),
            4 => Ok(Region::Four),
            other => Err(InputError::InvalidRegion(other)),
        }
    }
}

impl From<Region> for u8 {
    fn from(value: Region) -> Self {
        value.number()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InsuranceBase {
    OnGrossSalary,
    OnOtherAmount(f64),
}

impl InsuranceBase {
    /// Salary the contributions are computed from. A declared amount of zero
    /// falls back to the gross salary.
    pub fn resolve(self, gross: f64) -> f64 {
        match self {
            InsuranceBase::OnOtherAmount(amount) if amount > 0.0 => amount,
            _ => gross,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CalculationInput {
    pub amount: f64,
    pub direction: Direction,
    pub dependents: u32,
    pub region: Region,
    pub insurance_base: InsuranceBase,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub gross: f64,
    pub net: f64,
    pub social_ins: f64,
    pub health_ins: f64,
    pub unemployment_ins: f64,
    pub pre_tax_income: f64,
    pub total_deduction: f64,
    pub taxable_income: f64,
    pub pit: f64,
}

impl CalculationResult {
    pub fn total_insurance(&self) -> f64 {
        self.social_ins + self.health_ins + self.unemployment_ins
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketContribution {
    pub level: usize,
    pub rate: f64,
    pub upper_bound: Option<f64>,
    pub income: f64,
    pub tax: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegimeOutcome {
    pub regime: RegimeId,
    pub result: CalculationResult,
    pub net_diff_vs_baseline: f64,
    pub pit_diff_vs_baseline: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub direction: Direction,
    pub outcomes: Vec<RegimeOutcome>,
}
