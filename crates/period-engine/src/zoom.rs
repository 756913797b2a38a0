//! Zooming between levels of the calendar while tracking the browsing cursor.

use tracing::debug;

use crate::context::TemporalContext;
use crate::create::{create_period, to_period};
use crate::divide::divide;
use crate::error::Result;
use crate::period::Period;
use crate::unit::Unit;

/// Descend into the children of `period` at `unit`. Same as [`divide`].
pub fn zoom_in(ctx: &TemporalContext<'_>, period: &Period, unit: Unit) -> Result<Vec<Period>> {
    divide(ctx, period, unit)
}

/// Rebuild `period`'s reference date at a coarser `unit`.
///
/// Moves the browsing cursor to the day containing the reference date.
/// Never fails: a target that does not rank above the period's unit (such as
/// `quarter` to `stableMonth`, or a sideways move) behaves as [`zoom_to`], and
/// a `custom` target returns `period` unchanged.
pub fn zoom_out(ctx: &mut TemporalContext<'_>, period: &Period, unit: Unit) -> Period {
    let from = period.unit();
    if unit != Unit::Custom && from != Unit::Custom && !from.is_smaller_than(unit) {
        debug!(%from, to = %unit, "zoom out target is not larger, rebuilding in place");
    }
    zoom_to(ctx, period, unit)
}

/// Rebuild `period`'s reference date at any `unit`, hierarchical or not.
///
/// Moves the browsing cursor to the day containing the reference date.
pub fn zoom_to(ctx: &mut TemporalContext<'_>, period: &Period, unit: Unit) -> Period {
    let target = to_period(ctx, unit, period);
    let cursor = create_period(ctx, Unit::Day, period.reference_date());
    ctx.set_browsing(cursor);
    debug!(from = %period.unit(), to = %unit, "zoomed");
    target
}
