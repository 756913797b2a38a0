//! The [`Period`] value: a bounded, inclusive span of time tagged with a unit.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};
use crate::unit::Unit;

/// Smallest representable step between two instants of adjacent periods.
pub const RESOLUTION: TimeDelta = TimeDelta::milliseconds(1);

/// An immutable span `[start, end]` tagged with the [`Unit`] that produced it.
///
/// `reference_date` is the instant the period was derived from. It is carried
/// through navigation and zoom so that re-deriving a period is deterministic,
/// but it does not take part in equality: two periods are equal when their
/// unit and boundaries are equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPeriod")]
pub struct Period {
    unit: Unit,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reference_date: DateTime<Utc>,
}

impl Period {
    /// Assemble a period from already-computed boundaries.
    ///
    /// Callers inside the crate guarantee `start <= end`.
    pub(crate) fn from_parts(
        unit: Unit,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reference_date: DateTime<Utc>,
    ) -> Self {
        debug_assert!(start <= end, "period start after end");
        Self {
            unit,
            start,
            end,
            reference_date,
        }
    }

    /// A `custom` period spanning `[start, end]`, referenced at its midpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidRange`] if `start > end`.
    pub fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(PeriodError::InvalidRange(format!(
                "start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self::from_parts(Unit::Custom, start, end, midpoint(start, end)))
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn reference_date(&self) -> DateTime<Utc> {
        self.reference_date
    }

    /// Elapsed time from `start` to `end` (inclusive of the final millisecond).
    pub fn duration(&self) -> TimeDelta {
        (self.end - self.start) + RESOLUTION
    }

    pub fn midpoint(&self) -> DateTime<Utc> {
        midpoint(self.start, self.end)
    }

    /// Whether `target` lies entirely inside this period. See [`contains`](crate::compare::contains).
    pub fn contains<T: Containable + ?Sized>(&self, target: &T) -> bool {
        crate::compare::contains(self, target)
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.start == other.start && self.end == other.end
    }
}

impl Eq for Period {}

/// Wire form of a [`Period`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    unit: Unit,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reference_date: DateTime<Utc>,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        if raw.start > raw.end {
            return Err(PeriodError::InvalidRange(format!(
                "start {} is after end {}",
                raw.start.to_rfc3339(),
                raw.end.to_rfc3339()
            )));
        }
        Ok(Self {
            unit: raw.unit,
            start: raw.start,
            end: raw.end,
            reference_date: raw.reference_date,
        })
    }
}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unit.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

/// Anything with inclusive bounds that a [`Period`] can contain.
pub trait Containable {
    fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>);
}

impl Containable for DateTime<Utc> {
    fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (*self, *self)
    }
}

impl Containable for Period {
    fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }
}

/// Instant halfway between `start` and `end`, rounded toward `start`.
pub(crate) fn midpoint(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let half_ms = (end - start).num_milliseconds() / 2;
    start
        .checked_add_signed(TimeDelta::milliseconds(half_ms))
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_custom_rejects_reversed_range() {
        let err = Period::custom(utc(2024, 2, 1, 0), utc(2024, 1, 1, 0)).unwrap_err();
        assert!(matches!(err, PeriodError::InvalidRange(_)));
    }

    #[test]
    fn test_custom_reference_is_midpoint() {
        let p = Period::custom(utc(2024, 1, 1, 0), utc(2024, 1, 3, 0)).unwrap();
        assert_eq!(p.reference_date(), utc(2024, 1, 2, 0));
        assert_eq!(p.unit(), Unit::Custom);
    }

    #[test]
    fn test_equality_ignores_reference_date() {
        let a = Period::from_parts(Unit::Day, utc(2024, 1, 1, 0), utc(2024, 1, 1, 23), utc(2024, 1, 1, 3));
        let b = Period::from_parts(Unit::Day, utc(2024, 1, 1, 0), utc(2024, 1, 1, 23), utc(2024, 1, 1, 20));
        assert_eq!(a, b);

        let c = Period::from_parts(Unit::Custom, utc(2024, 1, 1, 0), utc(2024, 1, 1, 23), utc(2024, 1, 1, 3));
        assert_ne!(a, c);
    }

    #[test]
    fn test_duration_includes_final_millisecond() {
        let start = utc(2024, 1, 1, 0);
        let end = start + TimeDelta::days(1) - RESOLUTION;
        let p = Period::custom(start, end).unwrap();
        assert_eq!(p.duration(), TimeDelta::days(1));
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let p = Period::custom(utc(2024, 1, 1, 0), utc(2024, 1, 1, 2)).unwrap();
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["unit"], "custom");
        assert!(json.get("referenceDate").is_some());
    }

    #[test]
    fn test_deserialize_checks_range() {
        let p = Period::custom(utc(2024, 1, 1, 0), utc(2024, 1, 5, 0)).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.reference_date(), p.reference_date());

        let inverted = r#"{"unit":"day","start":"2024-01-05T00:00:00Z","end":"2024-01-01T00:00:00Z","referenceDate":"2024-01-03T00:00:00Z"}"#;
        let err = serde_json::from_str::<Period>(inverted).unwrap_err();
        assert!(err.to_string().contains("Invalid range"), "{err}");
    }
}
