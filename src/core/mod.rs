mod engine;
mod error;
mod insurance;
mod regime;
mod solver;
mod tax;
mod types;

pub use engine::{compare_regimes, compute, compute_gross_to_net};
pub use error::InputError;
pub use insurance::{InsuranceContributions, compute_insurance};
pub use regime::{
    Bracket, CAP_MULTIPLIER, FIXED_BASE_SALARY, INSURANCE_RATES, InsuranceRates, MinWageTable,
    RegimeConfig, list_regimes, regime_config, social_health_cap,
};
pub use solver::{
    SNAP_TOLERANCE, SolveConfig, SolveOutcome, compute_net_to_gross, solve_net_to_gross,
};
pub use tax::{compute_breakdown, compute_pit};
pub use types::{
    BracketContribution, CalculationInput, CalculationResult, Comparison, Direction,
    InsuranceBase, Region, RegimeId, RegimeOutcome,
};
