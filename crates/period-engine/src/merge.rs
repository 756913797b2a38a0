//! Recombination of periods into a single period.

use tracing::debug;

use crate::context::TemporalContext;
use crate::create::create_period;
use crate::period::{midpoint, Period, RESOLUTION};
use crate::unit::{TimeUnit, Unit};

/// Combine `periods` (in any order) into one period.
///
/// 1. No input gives `None`; one input is returned unchanged.
/// 2. Seven contiguous `day` periods that exactly fill a week become that
///    `week`; three contiguous `month` periods starting a quarter become that
///    `quarter`.
/// 3. Otherwise a `target` unit, if given, is built at the midpoint of the
///    combined span.
/// 4. Otherwise the result is a `custom` span from the earliest start to the
///    latest end, referenced at its midpoint.
///
/// Merging never fails: gaps, overlaps, and mixed units all degrade to a
/// `custom` span.
pub fn merge(ctx: &TemporalContext<'_>, periods: &[Period], target: Option<Unit>) -> Option<Period> {
    let (first, rest) = periods.split_first()?;
    if rest.is_empty() {
        return Some(*first);
    }

    let mut sorted = periods.to_vec();
    sorted.sort_by_key(|p| (p.start(), p.end()));

    if let Some(natural) = natural_week(ctx, &sorted).or_else(|| natural_quarter(ctx, &sorted)) {
        debug!(unit = %natural.unit(), inputs = sorted.len(), "merged into natural unit");
        return Some(natural);
    }

    let start = sorted[0].start();
    let end = sorted.iter().map(Period::end).max().unwrap_or(start);
    let reference = midpoint(start, end);

    let merged = match target {
        Some(unit) if unit != Unit::Custom => create_period(ctx, unit, reference),
        _ => Period::from_parts(Unit::Custom, start, end, reference),
    };
    debug!(unit = %merged.unit(), inputs = sorted.len(), "merged periods");
    Some(merged)
}

/// Each period begins one resolution step after the previous one ends.
fn is_contiguous(sorted: &[Period]) -> bool {
    sorted
        .windows(2)
        .all(|pair| pair[0].end().checked_add_signed(RESOLUTION) == Some(pair[1].start()))
}

fn natural_week(ctx: &TemporalContext<'_>, sorted: &[Period]) -> Option<Period> {
    if sorted.len() != 7 || !sorted.iter().all(|p| p.unit() == Unit::Day) || !is_contiguous(sorted) {
        return None;
    }
    let adapter = ctx.adapter();
    let ws = ctx.week_starts_on();
    let first = &sorted[0];
    let last = &sorted[6];
    let aligned = adapter.start_of(first.start(), TimeUnit::Week, ws) == first.start()
        && adapter.end_of(last.start(), TimeUnit::Week, ws) == last.end();
    aligned.then(|| create_period(ctx, Unit::Week, sorted[3].reference_date()))
}

fn natural_quarter(ctx: &TemporalContext<'_>, sorted: &[Period]) -> Option<Period> {
    if sorted.len() != 3 || !sorted.iter().all(|p| p.unit() == Unit::Month) || !is_contiguous(sorted) {
        return None;
    }
    let adapter = ctx.adapter();
    let ws = ctx.week_starts_on();
    let (_, first_month) = adapter.year_month(sorted[0].start());
    let starts_quarter = first_month.saturating_sub(1) % 3 == 0
        && adapter.start_of(sorted[0].start(), TimeUnit::Quarter, ws) == sorted[0].start();
    starts_quarter.then(|| create_period(ctx, Unit::Quarter, sorted[1].reference_date()))
}
