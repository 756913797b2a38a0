//! Period units and the calendar units an [`Adapter`](crate::adapter::Adapter) understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

// ── TimeUnit ────────────────────────────────────────────────────────────────

/// A primitive calendar unit with adapter-computable boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// All calendar units, largest first.
    pub const ALL: [TimeUnit; 8] = [
        TimeUnit::Year,
        TimeUnit::Quarter,
        TimeUnit::Month,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];
}

impl From<TimeUnit> for Unit {
    fn from(unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Year => Unit::Year,
            TimeUnit::Quarter => Unit::Quarter,
            TimeUnit::Month => Unit::Month,
            TimeUnit::Week => Unit::Week,
            TimeUnit::Day => Unit::Day,
            TimeUnit::Hour => Unit::Hour,
            TimeUnit::Minute => Unit::Minute,
            TimeUnit::Second => Unit::Second,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Unit::from(*self).fmt(f)
    }
}

// ── Unit ────────────────────────────────────────────────────────────────────

/// The granularity tag of a [`Period`](crate::period::Period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    /// Six whole weeks covering a calendar month, for calendar grids.
    StableMonth,
    /// An arbitrary span with no derivable boundaries.
    Custom,
}

impl Unit {
    /// All units, in declaration order.
    pub const ALL: [Unit; 10] = [
        Unit::Year,
        Unit::Quarter,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::StableMonth,
        Unit::Custom,
    ];

    /// The calendar unit used to compute boundaries for this unit.
    ///
    /// `StableMonth` is anchored on its month; `Custom` has no calendar unit.
    pub fn calendar(self) -> Option<TimeUnit> {
        match self {
            Unit::Year => Some(TimeUnit::Year),
            Unit::Quarter => Some(TimeUnit::Quarter),
            Unit::Month | Unit::StableMonth => Some(TimeUnit::Month),
            Unit::Week => Some(TimeUnit::Week),
            Unit::Day => Some(TimeUnit::Day),
            Unit::Hour => Some(TimeUnit::Hour),
            Unit::Minute => Some(TimeUnit::Minute),
            Unit::Second => Some(TimeUnit::Second),
            Unit::Custom => None,
        }
    }

    /// Position in the unit hierarchy (larger spans rank higher).
    ///
    /// `Custom` is outside the hierarchy.
    pub fn rank(self) -> Option<u8> {
        match self {
            Unit::Second => Some(0),
            Unit::Minute => Some(1),
            Unit::Hour => Some(2),
            Unit::Day => Some(3),
            Unit::Week => Some(4),
            Unit::Month => Some(5),
            Unit::StableMonth => Some(6),
            Unit::Quarter => Some(7),
            Unit::Year => Some(8),
            Unit::Custom => None,
        }
    }

    /// Whether `self` sits strictly below `other` in the hierarchy.
    pub fn is_smaller_than(self, other: Unit) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Quarter => "quarter",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::StableMonth => "stableMonth",
            Unit::Custom => "custom",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = PeriodError;

    /// Parse a unit name (case-insensitive, singular or plural).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        let unit = match normalized.as_str() {
            "year" | "years" | "y" => Unit::Year,
            "quarter" | "quarters" | "q" => Unit::Quarter,
            "month" | "months" => Unit::Month,
            "week" | "weeks" | "w" => Unit::Week,
            "day" | "days" | "d" => Unit::Day,
            "hour" | "hours" | "h" => Unit::Hour,
            "minute" | "minutes" | "min" => Unit::Minute,
            "second" | "seconds" | "sec" | "s" => Unit::Second,
            "stablemonth" | "stablemonths" => Unit::StableMonth,
            "custom" => Unit::Custom,
            _ => return Err(PeriodError::InvalidUnit(format!("'{}'", s.trim()))),
        };
        Ok(unit)
    }
}
