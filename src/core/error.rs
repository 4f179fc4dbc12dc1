use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown regime '{0}', expected one of 2025, 2026-h1, 2026-h2")]
    UnknownRegime(String),

    #[error("region must be between 1 and 4, got {0}")]
    InvalidRegion(u8),

    #[error("unknown direction '{0}', expected gross-to-net or net-to-gross")]
    InvalidDirection(String),

    #[error("{field} must be a finite amount >= 0")]
    InvalidAmount { field: &'static str },
}
