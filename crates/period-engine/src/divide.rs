//! Subdivision of a period into contiguous child periods of a smaller unit.

use tracing::{debug, trace, warn};

use crate::context::TemporalContext;
use crate::create::{create_period, STABLE_MONTH_DAYS};
use crate::error::{PeriodError, Result};
use crate::period::Period;
use crate::unit::{TimeUnit, Unit};

/// Split `period` into the ordered, gap-free children of `unit` that cover it.
///
/// Children whose natural boundaries stick out of the parent (a week that
/// straddles the end of a month) are clamped to the parent's `start`/`end`,
/// so the union of the children is exactly `[period.start, period.end]`.
///
/// A `stableMonth` parent divides only into `day` (always 42 children) or
/// `week` (always 6).
///
/// # Errors
///
/// - [`PeriodError::InvalidDivision`] if `unit` is `stableMonth` or `custom`,
///   if `period` is `custom`, or if `unit` is not strictly smaller than the
///   parent's unit.
/// - [`PeriodError::IterationOverflow`] if enumeration runs past the
///   context's `max_iterations`. With the default cap of
///   [`DEFAULT_MAX_ITERATIONS`](crate::context::DEFAULT_MAX_ITERATIONS)
///   (100 000) a day divides into seconds (86 400) and a year into hours
///   (at most 8 784), but a week into seconds (604 800), a month into
///   seconds, or a year into minutes (at least 525 600) overflows; raise
///   `TemporalOptions::max_iterations` for those.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use period_engine::{create_period, divide, ChronoAdapter, TemporalContext, Unit};
///
/// let adapter = ChronoAdapter::utc();
/// let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
/// let ctx = TemporalContext::new(&adapter, now);
///
/// let months = divide(&ctx, &create_period(&ctx, Unit::Year, now), Unit::Month).unwrap();
/// assert_eq!(months.len(), 12);
/// ```
pub fn divide(ctx: &TemporalContext<'_>, period: &Period, unit: Unit) -> Result<Vec<Period>> {
    match unit {
        Unit::StableMonth => {
            return Err(PeriodError::InvalidDivision(
                "stableMonth is not a division target; build it with create_period or zoom_out"
                    .to_string(),
            ));
        }
        Unit::Custom => {
            return Err(PeriodError::InvalidDivision(
                "cannot divide into custom periods; use split with a count or duration"
                    .to_string(),
            ));
        }
        _ => {}
    }

    let children = match period.unit() {
        Unit::Custom => {
            return Err(PeriodError::InvalidDivision(
                "cannot divide a custom period; use split with a count or duration".to_string(),
            ));
        }
        Unit::StableMonth => divide_stable_month(ctx, period, unit)?,
        parent => {
            if !unit.is_smaller_than(parent) {
                return Err(PeriodError::InvalidDivision(format!(
                    "{unit} is not smaller than {parent}"
                )));
            }
            divide_calendar(ctx, period, unit)?
        }
    };

    debug!(
        parent = %period.unit(),
        %unit,
        count = children.len(),
        "divided period"
    );
    Ok(children)
}

/// Enumerate `unit` instances across the parent, clamping the edges.
fn divide_calendar(ctx: &TemporalContext<'_>, parent: &Period, unit: Unit) -> Result<Vec<Period>> {
    let Some(tu) = unit.calendar() else {
        return Err(PeriodError::InvalidDivision(format!(
            "{unit} has no calendar boundaries"
        )));
    };
    let adapter = ctx.adapter();
    let ws = ctx.week_starts_on();
    let limit = ctx.max_iterations();

    let mut children: Vec<Period> = Vec::new();
    for (step, representative) in adapter
        .each_interval(parent.start(), parent.end(), tu, ws)
        .enumerate()
    {
        if step >= limit {
            warn!(%unit, limit, "division enumeration exceeded its cap");
            return Err(PeriodError::IterationOverflow { limit });
        }

        let start = adapter.start_of(representative, tu, ws).max(parent.start());
        let end = adapter.end_of(representative, tu, ws).min(parent.end());
        if start > end {
            trace!(%representative, "representative outside parent, skipped");
            continue;
        }
        if children.last().is_some_and(|last| start <= last.end()) {
            trace!(%representative, "representative overlaps previous child, skipped");
            continue;
        }

        let reference = representative.clamp(start, end);
        children.push(Period::from_parts(unit, start, end, reference));
    }

    Ok(children)
}

/// Walk the 42 grid days one calendar day at a time; weeks group them by seven.
fn divide_stable_month(
    ctx: &TemporalContext<'_>,
    parent: &Period,
    unit: Unit,
) -> Result<Vec<Period>> {
    if !matches!(unit, Unit::Day | Unit::Week) {
        return Err(PeriodError::InvalidDivision(format!(
            "stableMonth divides only into day or week, not {unit}"
        )));
    }

    let adapter = ctx.adapter();
    let limit = ctx.max_iterations();
    let mut days = Vec::with_capacity(STABLE_MONTH_DAYS as usize);
    let mut cursor = parent.start();
    while cursor <= parent.end() {
        if days.len() >= limit {
            warn!(limit, "stableMonth day walk exceeded its cap");
            return Err(PeriodError::IterationOverflow { limit });
        }
        days.push(create_period(ctx, Unit::Day, cursor));

        let next = adapter.add(cursor, 1, TimeUnit::Day);
        if next <= cursor {
            warn!(%cursor, "adapter failed to advance by one day");
            return Err(PeriodError::IterationOverflow { limit });
        }
        cursor = next;
    }

    if unit == Unit::Day {
        return Ok(days);
    }

    Ok(days
        .chunks(7)
        .map(|week| create_period(ctx, Unit::Week, week[0].start()))
        .collect())
}

// ── Tests ───────────────────────────────────────────────────────────────────
