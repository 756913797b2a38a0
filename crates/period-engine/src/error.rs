//! Error types for period-engine operations.
//!
//! Every variant is a programmer error: the inputs were structurally wrong,
//! and retrying with the same inputs gives the same result.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid division: {0}")]
    InvalidDivision(String),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Missing split strategy: {0}")]
    MissingSplitStrategy(String),

    #[error("Iteration overflow: enumeration exceeded {limit} steps")]
    IterationOverflow { limit: usize },

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid week start: {0}")]
    InvalidWeekStart(String),
}

pub type Result<T> = std::result::Result<T, PeriodError>;
