//! The [`TemporalContext`] every operation runs against.

use chrono::{DateTime, Utc, Weekday};
use serde::Deserialize;
use tracing::debug;

use crate::adapter::Adapter;
use crate::create::create_period;
use crate::error::{PeriodError, Result};
use crate::period::Period;
use crate::unit::Unit;

/// Default cap on enumeration steps in `divide` and duration `split`.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemporalOptions {
    /// Which day begins a week for `week` and `stableMonth` boundaries.
    pub week_starts_on: Weekday,
    /// Upper bound on enumeration steps before [`PeriodError::IterationOverflow`].
    pub max_iterations: usize,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            week_starts_on: Weekday::Mon,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Convert the numeric week-start form (0 = Sunday .. 6 = Saturday).
///
/// # Errors
///
/// Returns [`PeriodError::InvalidWeekStart`] for values above 6.
pub fn week_start_from_index(index: u8) -> Result<Weekday> {
    if index > 6 {
        return Err(PeriodError::InvalidWeekStart(format!(
            "expected 0-6 (0 = Sunday), got {index}"
        )));
    }
    Ok((0..index).fold(Weekday::Sun, |day, _| day.succ()))
}

/// Adapter, configuration, and the two cursors of one logical session.
///
/// The adapter is borrowed; one adapter can serve many contexts. Cursor
/// writes take `&mut self`, so concurrent zooms on a shared context need an
/// outer lock.
pub struct TemporalContext<'a> {
    adapter: &'a dyn Adapter,
    options: TemporalOptions,
    browsing: Period,
    now: Period,
}

impl<'a> TemporalContext<'a> {
    /// Create a context whose `now` and `browsing` cursors are the day containing `now`.
    ///
    /// The engine never reads the system clock; the caller supplies the anchor.
    pub fn new(adapter: &'a dyn Adapter, now: DateTime<Utc>) -> Self {
        Self::with_options(adapter, now, TemporalOptions::default())
    }

    pub fn with_options(adapter: &'a dyn Adapter, now: DateTime<Utc>, options: TemporalOptions) -> Self {
        let mut ctx = Self {
            adapter,
            options,
            browsing: Period::from_parts(Unit::Custom, now, now, now),
            now: Period::from_parts(Unit::Custom, now, now, now),
        };
        let today = create_period(&ctx, Unit::Day, now);
        ctx.browsing = today;
        ctx.now = today;
        ctx
    }

    pub fn adapter(&self) -> &'a dyn Adapter {
        self.adapter
    }

    pub fn options(&self) -> &TemporalOptions {
        &self.options
    }

    pub fn week_starts_on(&self) -> Weekday {
        self.options.week_starts_on
    }

    pub fn max_iterations(&self) -> usize {
        self.options.max_iterations
    }

    /// What the caller is currently looking at.
    pub fn browsing(&self) -> &Period {
        &self.browsing
    }

    pub fn set_browsing(&mut self, period: Period) {
        debug!(unit = %period.unit(), start = %period.start(), "browsing cursor moved");
        self.browsing = period;
    }

    /// The current moment, as last supplied by the caller.
    pub fn now(&self) -> &Period {
        &self.now
    }

    pub fn set_now(&mut self, period: Period) {
        self.now = period;
    }
}

impl std::fmt::Debug for TemporalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalContext")
            .field("options", &self.options)
            .field("browsing", &self.browsing)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrono_adapter::ChronoAdapter;
    use chrono::TimeZone;

    #[test]
    fn test_week_start_from_index() {
        assert_eq!(week_start_from_index(0).unwrap(), Weekday::Sun);
        assert_eq!(week_start_from_index(1).unwrap(), Weekday::Mon);
        assert_eq!(week_start_from_index(6).unwrap(), Weekday::Sat);
        assert!(matches!(
            week_start_from_index(7),
            Err(PeriodError::InvalidWeekStart(_))
        ));
    }

    #[test]
    fn test_new_context_cursors_are_today() {
        let adapter = ChronoAdapter::utc();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 13, 0, 0).unwrap();
        let ctx = TemporalContext::new(&adapter, now);
        assert_eq!(ctx.now().unit(), Unit::Day);
        assert_eq!(ctx.browsing().start(), Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(ctx.now().reference_date(), now);
        assert_eq!(ctx.week_starts_on(), Weekday::Mon);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: TemporalOptions = serde_json::from_str(r#"{"week_starts_on":"Sun"}"#).unwrap();
        assert_eq!(opts.week_starts_on, Weekday::Sun);
        assert_eq!(opts.max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
