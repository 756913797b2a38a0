//! Moving a period forward and backward by whole units.
//!
//! Navigation shifts the reference date through the adapter and rebuilds the
//! period with [`create_period`]. Shifting `start`/`end` directly would drift,
//! because months are 28 to 31 days long and DST days are 23 or 25 hours.

use tracing::debug;

use crate::context::TemporalContext;
use crate::create::create_period;
use crate::error::{PeriodError, Result};
use crate::period::Period;
use crate::unit::{TimeUnit, Unit};

/// The calendar translation one step of `unit` corresponds to.
fn step_of(unit: Unit) -> Result<(i64, TimeUnit)> {
    match unit {
        Unit::Year => Ok((1, TimeUnit::Year)),
        Unit::Quarter => Ok((3, TimeUnit::Month)),
        Unit::StableMonth => Ok((1, TimeUnit::Month)),
        Unit::Month => Ok((1, TimeUnit::Month)),
        Unit::Week => Ok((1, TimeUnit::Week)),
        Unit::Day => Ok((1, TimeUnit::Day)),
        Unit::Hour => Ok((1, TimeUnit::Hour)),
        Unit::Minute => Ok((1, TimeUnit::Minute)),
        Unit::Second => Ok((1, TimeUnit::Second)),
        Unit::Custom => Err(PeriodError::InvalidUnit(
            "custom periods have no calendar step to navigate by".to_string(),
        )),
    }
}

/// The period `steps` units away from `period` (negative goes back).
///
/// Zero steps returns `period` unchanged without consulting the adapter.
///
/// # Errors
///
/// Returns [`PeriodError::InvalidUnit`] for a `custom` period.
pub fn go(ctx: &TemporalContext<'_>, period: &Period, steps: i64) -> Result<Period> {
    if steps == 0 {
        return Ok(*period);
    }
    let (amount, unit) = step_of(period.unit())?;
    let adapter = ctx.adapter();
    let scaled = amount.saturating_mul(steps);
    let reference = if scaled >= 0 {
        adapter.add(period.reference_date(), scaled, unit)
    } else {
        adapter.subtract(period.reference_date(), scaled.saturating_neg(), unit)
    };

    let moved = create_period(ctx, period.unit(), reference);
    debug!(unit = %period.unit(), steps, start = %moved.start(), "navigated");
    Ok(moved)
}

/// The period immediately after `period`.
pub fn next(ctx: &TemporalContext<'_>, period: &Period) -> Result<Period> {
    go(ctx, period, 1)
}

/// The period immediately before `period`.
pub fn previous(ctx: &TemporalContext<'_>, period: &Period) -> Result<Period> {
    go(ctx, period, -1)
}
