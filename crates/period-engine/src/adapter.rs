//! The calendar capability set the engine is built on.
//!
//! The engine never does calendar arithmetic itself. Every boundary, every
//! translation, and every enumeration goes through an [`Adapter`], so the
//! same engine runs over any calendar backend (UTC, an IANA zone with DST,
//! a test double). [`ChronoAdapter`](crate::chrono_adapter::ChronoAdapter)
//! is the bundled backend.
//!
//! Adapter methods are total. A backend that cannot represent a result
//! saturates at the edge of its range rather than failing.

use chrono::{DateTime, Utc, Weekday};

use crate::unit::TimeUnit;

/// Lazy sequence of representative instants produced by [`Adapter::each_interval`].
pub type Instants<'a> = Box<dyn Iterator<Item = DateTime<Utc>> + 'a>;

/// Primitive calendar operations consumed by every period operation.
pub trait Adapter {
    /// Earliest instant of the `unit` containing `date`.
    fn start_of(&self, date: DateTime<Utc>, unit: TimeUnit, week_starts_on: Weekday)
        -> DateTime<Utc>;

    /// Latest instant (millisecond resolution) of the `unit` containing `date`.
    fn end_of(&self, date: DateTime<Utc>, unit: TimeUnit, week_starts_on: Weekday)
        -> DateTime<Utc>;

    /// Translate `date` by `amount` units, calendar-correct.
    fn add(&self, date: DateTime<Utc>, amount: i64, unit: TimeUnit) -> DateTime<Utc>;

    fn subtract(&self, date: DateTime<Utc>, amount: i64, unit: TimeUnit) -> DateTime<Utc> {
        self.add(date, amount.saturating_neg(), unit)
    }

    /// Whether both instants fall in the same `unit` bucket.
    fn is_same(
        &self,
        a: DateTime<Utc>,
        b: DateTime<Utc>,
        unit: TimeUnit,
        week_starts_on: Weekday,
    ) -> bool {
        self.start_of(a, unit, week_starts_on) == self.start_of(b, unit, week_starts_on)
    }

    /// One representative instant per `unit` instance overlapping `[start, end]`,
    /// in chronological order.
    ///
    /// The sequence is lazy so that callers can bound it.
    fn each_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        unit: TimeUnit,
        week_starts_on: Weekday,
    ) -> Instants<'_>;

    /// Calendar year and 1-based month of `date`.
    fn year_month(&self, date: DateTime<Utc>) -> (i32, u32);
}
