//! Period construction from a reference instant.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::context::TemporalContext;
use crate::period::Period;
use crate::unit::{TimeUnit, Unit};

/// Days in a stable-month grid (six whole weeks).
pub const STABLE_MONTH_DAYS: i64 = 42;

/// Build the period of `unit` that contains `date`.
///
/// - `StableMonth`: the six-week grid starting on the week start of the
///   month's first day.
/// - `Custom`: the zero-length span `[date, date]`; custom periods have no
///   derivable boundaries.
/// - Anything else: the adapter's `start_of`/`end_of` for `date`.
///
/// The result always contains `date`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use period_engine::{create_period, ChronoAdapter, TemporalContext, Unit};
///
/// let adapter = ChronoAdapter::utc();
/// let now = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
/// let ctx = TemporalContext::new(&adapter, now);
///
/// let february = create_period(&ctx, Unit::Month, now);
/// assert_eq!(february.end().format("%Y-%m-%d").to_string(), "2024-02-29");
/// ```
pub fn create_period(ctx: &TemporalContext<'_>, unit: Unit, date: DateTime<Utc>) -> Period {
    let adapter = ctx.adapter();
    let ws = ctx.week_starts_on();

    let period = match (unit, unit.calendar()) {
        (Unit::StableMonth, _) => {
            let first_of_month = adapter.start_of(date, TimeUnit::Month, ws);
            let start = adapter.start_of(first_of_month, TimeUnit::Week, ws);
            let last_day = adapter.add(start, STABLE_MONTH_DAYS - 1, TimeUnit::Day);
            let end = adapter.end_of(last_day, TimeUnit::Day, ws);
            Period::from_parts(Unit::StableMonth, start, end, date)
        }
        (_, Some(tu)) => {
            let start = adapter.start_of(date, tu, ws);
            let end = adapter.end_of(date, tu, ws);
            Period::from_parts(unit, start, end, date)
        }
        (_, None) => Period::from_parts(Unit::Custom, date, date, date),
    };

    trace!(%unit, start = %period.start(), end = %period.end(), "created period");
    period
}

/// Re-derive `period` at `unit`, reusing its reference date.
///
/// A `Custom` target returns `period` unchanged.
pub fn to_period(ctx: &TemporalContext<'_>, unit: Unit, period: &Period) -> Period {
    match unit {
        Unit::Custom => *period,
        _ => create_period(ctx, unit, period.reference_date()),
    }
}
