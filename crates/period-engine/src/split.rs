//! Flexible partitioning of a period: by unit, by count, or by duration.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::context::TemporalContext;
use crate::divide::divide;
use crate::duration::CalendarDuration;
use crate::error::{PeriodError, Result};
use crate::period::{midpoint, Period, RESOLUTION};
use crate::unit::Unit;

/// How to partition a period. Exactly one strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Calendar children of a smaller unit (same as [`divide`]).
    By(Unit),
    /// `n` slices of equal elapsed time.
    Count(usize),
    /// Consecutive slices of a calendar duration, the last one clamped.
    Duration(CalendarDuration),
}

/// Loosely-typed split request, as read from configuration or a caller.
///
/// Converts to a [`SplitStrategy`] only when exactly one field is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    pub by: Option<Unit>,
    pub count: Option<usize>,
    pub duration: Option<CalendarDuration>,
}

impl TryFrom<SplitOptions> for SplitStrategy {
    type Error = PeriodError;

    fn try_from(options: SplitOptions) -> Result<Self> {
        match (options.by, options.count, options.duration) {
            (Some(unit), None, None) => Ok(SplitStrategy::By(unit)),
            (None, Some(n), None) => Ok(SplitStrategy::Count(n)),
            (None, None, Some(d)) => Ok(SplitStrategy::Duration(d)),
            (None, None, None) => Err(PeriodError::MissingSplitStrategy(
                "one of by, count, or duration is required".to_string(),
            )),
            _ => Err(PeriodError::MissingSplitStrategy(
                "by, count, and duration are mutually exclusive".to_string(),
            )),
        }
    }
}

/// Partition `period` according to `options`.
///
/// # Errors
///
/// [`PeriodError::MissingSplitStrategy`] unless exactly one option is set;
/// otherwise see [`split_with`].
pub fn split(ctx: &TemporalContext<'_>, period: &Period, options: SplitOptions) -> Result<Vec<Period>> {
    split_with(ctx, period, SplitStrategy::try_from(options)?)
}

/// Partition `period` into contiguous, ordered slices that exactly cover it.
///
/// # Errors
///
/// - `By`: whatever [`divide`] returns.
/// - `Count`: [`PeriodError::InvalidSplit`] for zero, or for more slices than
///   the span has milliseconds.
/// - `Duration`: [`PeriodError::InvalidSplit`] if the duration does not move
///   time forward, [`PeriodError::IterationOverflow`] past the context's cap.
pub fn split_with(
    ctx: &TemporalContext<'_>,
    period: &Period,
    strategy: SplitStrategy,
) -> Result<Vec<Period>> {
    let slices = match strategy {
        SplitStrategy::By(unit) => divide(ctx, period, unit)?,
        SplitStrategy::Count(n) => split_by_count(period, n)?,
        SplitStrategy::Duration(d) => split_by_duration(ctx, period, &d)?,
    };
    debug!(?strategy, count = slices.len(), "split period");
    Ok(slices)
}

fn custom_slice(start: DateTime<Utc>, end: DateTime<Utc>) -> Period {
    Period::from_parts(Unit::Custom, start, end, midpoint(start, end))
}

fn split_by_count(period: &Period, n: usize) -> Result<Vec<Period>> {
    if n == 0 {
        return Err(PeriodError::InvalidSplit("count must be at least 1".to_string()));
    }
    // Inclusive span in milliseconds.
    let total = i128::from(period.duration().num_milliseconds());
    let slices = n as i128;
    if slices > total {
        return Err(PeriodError::InvalidSplit(format!(
            "cannot cut {total} ms into {n} slices"
        )));
    }

    let offset = |i: i128| -> DateTime<Utc> {
        let ms = (total * i / slices) as i64;
        period.start() + TimeDelta::milliseconds(ms)
    };

    let mut out = Vec::with_capacity(n);
    for i in 0..slices {
        let start = offset(i);
        let end = if i + 1 == slices {
            period.end()
        } else {
            offset(i + 1) - RESOLUTION
        };
        out.push(custom_slice(start, end));
    }
    Ok(out)
}

fn split_by_duration(
    ctx: &TemporalContext<'_>,
    period: &Period,
    duration: &CalendarDuration,
) -> Result<Vec<Period>> {
    let adapter = ctx.adapter();
    let limit = ctx.max_iterations();

    let mut out = Vec::new();
    let mut cursor = period.start();
    while cursor <= period.end() {
        if out.len() >= limit {
            warn!(%duration, limit, "duration split exceeded its cap");
            return Err(PeriodError::IterationOverflow { limit });
        }
        let next = duration.apply(adapter, cursor);
        if next <= cursor {
            return Err(PeriodError::InvalidSplit(format!(
                "duration {duration} does not advance from {}",
                cursor.to_rfc3339()
            )));
        }
        let end = (next - RESOLUTION).min(period.end());
        out.push(custom_slice(cursor, end));
        cursor = next;
    }
    Ok(out)
}
