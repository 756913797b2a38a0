//! Containment and same-bucket predicates. Both are total.

use crate::context::TemporalContext;
use crate::period::{Containable, Period};
use crate::unit::{TimeUnit, Unit};

/// Whether `target` lies entirely within `period`, boundaries included.
///
/// An instant is contained when `start <= target <= end`; a period only
/// when both of its ends are (partial overlap is not containment).
pub fn contains<T: Containable + ?Sized>(period: &Period, target: &T) -> bool {
    let (start, end) = target.bounds();
    period.start() <= start && end <= period.end()
}

/// Whether the reference dates of `a` and `b` fall in the same `unit` bucket.
///
/// Missing inputs give `false`. Quarters are bucketed here from the
/// adapter's year and month rather than delegated; `stableMonth` compares
/// as month, and `custom` requires identical reference instants.
pub fn is_same(ctx: &TemporalContext<'_>, a: Option<&Period>, b: Option<&Period>, unit: Unit) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    let (ra, rb) = (a.reference_date(), b.reference_date());
    let adapter = ctx.adapter();

    match unit.calendar() {
        None => ra == rb,
        Some(TimeUnit::Quarter) => {
            let (ya, ma) = adapter.year_month(ra);
            let (yb, mb) = adapter.year_month(rb);
            ya == yb && quarter_index(ma) == quarter_index(mb)
        }
        Some(tu) => adapter.is_same(ra, rb, tu, ctx.week_starts_on()),
    }
}

/// Zero-based quarter of a 1-based month; a month of 0 counts as the first quarter.
pub(crate) fn quarter_index(month: u32) -> u32 {
    month.saturating_sub(1) / 3
}
