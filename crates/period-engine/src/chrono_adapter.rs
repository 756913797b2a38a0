//! [`Adapter`] backed by `chrono` and the IANA database from `chrono-tz`.
//!
//! Day-and-larger boundaries are computed on local wall-clock dates in the
//! adapter's zone and resolved back to instants. Sub-day boundaries truncate
//! the instant itself, so a wall-clock hour that repeats at a fall-back
//! transition keeps its own offset, and a unit cut short by an offset change
//! starts at the transition.
//!
//! # Local time resolution
//!
//! - Ambiguous local times (fall-back overlap) resolve to the earliest instant.
//! - Nonexistent local times (spring-forward gap) resolve by reading the wall
//!   clock with the offset in force before the gap, which lands on the
//!   instant the gap skips to.
//!
//! # Translation
//!
//! - `Year`, `Quarter`, `Month`: wall-clock months, clamped to the end of a
//!   shorter month (Jan 31 + 1 month = Feb 28 or 29).
//! - `Week`, `Day`: wall-clock days, preserving the time of day across DST.
//! - `Hour`, `Minute`, `Second`: absolute elapsed time.
//!
//! Results outside chrono's range saturate to `MIN_UTC` / `MAX_UTC`.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::adapter::{Adapter, Instants};
use crate::error::{PeriodError, Result};
use crate::unit::TimeUnit;

/// Calendar backend for one IANA time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChronoAdapter {
    tz: Tz,
}

impl Default for ChronoAdapter {
    fn default() -> Self {
        Self::utc()
    }
}

impl ChronoAdapter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Build an adapter from an IANA zone name (e.g. `"America/New_York"`).
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidTimezone`] if the name is not in the IANA database.
    pub fn from_name(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| PeriodError::InvalidTimezone(format!("'{}'", name)))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Resolve a wall-clock datetime in this zone to an instant.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                // A day earlier is safely before any gap, including whole skipped days.
                let before = naive
                    .checked_sub_signed(chrono::Duration::days(1))
                    .unwrap_or(naive);
                let offset = self.tz.offset_from_utc_datetime(&before).fix();
                let utc_naive = naive
                    .checked_sub_signed(chrono::Duration::seconds(i64::from(
                        offset.local_minus_utc(),
                    )))
                    .unwrap_or(naive);
                Utc.from_utc_datetime(&utc_naive)
            }
        }
    }

    /// Resolve local midnight of `date` in this zone.
    pub fn start_of_local_date(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve_local(date.and_time(NaiveTime::MIN))
    }

    fn local(&self, date: DateTime<Utc>) -> NaiveDateTime {
        date.with_timezone(&self.tz).naive_local()
    }

    fn add_months(&self, date: DateTime<Utc>, months: i64) -> DateTime<Utc> {
        let local = self.local(date);
        let shifted = u32::try_from(months.unsigned_abs())
            .ok()
            .and_then(|n| {
                if months >= 0 {
                    local.checked_add_months(Months::new(n))
                } else {
                    local.checked_sub_months(Months::new(n))
                }
            });
        match shifted {
            Some(naive) => self.resolve_local(naive),
            None => saturate(months),
        }
    }

    fn add_days(&self, date: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        let local = self.local(date);
        let n = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            local.checked_add_days(n)
        } else {
            local.checked_sub_days(n)
        };
        match shifted {
            Some(naive) => self.resolve_local(naive),
            None => saturate(days),
        }
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> i32 {
        self.tz
            .offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc()
    }

    /// Strip the local sub-unit fields off the instant.
    ///
    /// When an offset change falls between the truncated instant and `date`
    /// (e.g. a 30-minute DST shift), the unit starts at the transition.
    fn truncate_sub_day(&self, date: DateTime<Utc>, unit: TimeUnit) -> DateTime<Utc> {
        let local = date.with_timezone(&self.tz);
        let seconds = match unit {
            TimeUnit::Hour => i64::from(local.minute()) * 60 + i64::from(local.second()),
            TimeUnit::Minute => i64::from(local.second()),
            _ => 0,
        };
        let nanos = i64::from(local.nanosecond() % 1_000_000_000);
        let Some(candidate) = date
            .checked_sub_signed(chrono::Duration::seconds(seconds))
            .and_then(|d| d.checked_sub_signed(chrono::Duration::nanoseconds(nanos)))
        else {
            return DateTime::<Utc>::MIN_UTC;
        };

        let offset = self.offset_at(date);
        if self.offset_at(candidate) == offset {
            return candidate;
        }

        // Transitions fall on whole seconds in (candidate, date].
        let (mut lo, mut hi) = (candidate.timestamp(), date.timestamp());
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let at_mid = DateTime::from_timestamp(mid, 0).map(|t| self.offset_at(t));
            if at_mid == Some(offset) {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        DateTime::from_timestamp(hi, 0).unwrap_or(candidate)
    }
}

/// How many days `weekday` is from the configured week-start day.
pub(crate) fn days_from_week_start(weekday: Weekday, week_starts_on: Weekday) -> u64 {
    u64::from((weekday.num_days_from_monday() + 7 - week_starts_on.num_days_from_monday()) % 7)
}

fn saturate(amount: i64) -> DateTime<Utc> {
    if amount >= 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    }
}

fn add_elapsed(date: DateTime<Utc>, delta: Option<TimeDelta>, amount: i64) -> DateTime<Utc> {
    delta
        .and_then(|d| date.checked_add_signed(d))
        .unwrap_or_else(|| saturate(amount))
}

impl Adapter for ChronoAdapter {
    fn start_of(
        &self,
        date: DateTime<Utc>,
        unit: TimeUnit,
        week_starts_on: Weekday,
    ) -> DateTime<Utc> {
        let local = date.with_timezone(&self.tz);

        if matches!(unit, TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second) {
            return self.truncate_sub_day(date, unit);
        }

        let today = local.date_naive();
        let first_day = match unit {
            TimeUnit::Day => Some(today),
            TimeUnit::Week => {
                today.checked_sub_days(Days::new(days_from_week_start(today.weekday(), week_starts_on)))
            }
            TimeUnit::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1),
            TimeUnit::Quarter => {
                let q_start_month = ((today.month() - 1) / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), q_start_month, 1)
            }
            TimeUnit::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second => Some(today),
        };

        match first_day {
            Some(day) => self.start_of_local_date(day),
            None => DateTime::<Utc>::MIN_UTC,
        }
    }

    fn end_of(&self, date: DateTime<Utc>, unit: TimeUnit, week_starts_on: Weekday) -> DateTime<Utc> {
        let start = self.start_of(date, unit, week_starts_on);
        let next_start = self.start_of(self.add(start, 1, unit), unit, week_starts_on);
        if next_start <= start {
            return DateTime::<Utc>::MAX_UTC;
        }
        next_start
            .checked_sub_signed(chrono::Duration::milliseconds(1))
            .unwrap_or(start)
    }

    fn add(&self, date: DateTime<Utc>, amount: i64, unit: TimeUnit) -> DateTime<Utc> {
        match unit {
            TimeUnit::Year => self.add_months(date, amount.saturating_mul(12)),
            TimeUnit::Quarter => self.add_months(date, amount.saturating_mul(3)),
            TimeUnit::Month => self.add_months(date, amount),
            TimeUnit::Week => self.add_days(date, amount.saturating_mul(7)),
            TimeUnit::Day => self.add_days(date, amount),
            TimeUnit::Hour => add_elapsed(date, TimeDelta::try_hours(amount), amount),
            TimeUnit::Minute => add_elapsed(date, TimeDelta::try_minutes(amount), amount),
            TimeUnit::Second => add_elapsed(date, TimeDelta::try_seconds(amount), amount),
        }
    }

    fn each_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        unit: TimeUnit,
        week_starts_on: Weekday,
    ) -> Instants<'_> {
        if start > end {
            return Box::new(std::iter::empty());
        }
        let first = self.start_of(start, unit, week_starts_on);
        Box::new(std::iter::successors(Some(first), move |&current| {
            let next = self.start_of(self.add(current, 1, unit), unit, week_starts_on);
            (next > current && next <= end).then_some(next)
        }))
    }

    fn year_month(&self, date: DateTime<Utc>) -> (i32, u32) {
        let local = date.with_timezone(&self.tz);
        (local.year(), local.month())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    fn ms(dt: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
        dt + chrono::Duration::milliseconds(millis)
    }

    // ── boundaries in UTC ───────────────────────────────────────────────

    #[test]
    fn test_start_and_end_of_day() {
        let a = ChronoAdapter::utc();
        let t = utc(2024, 6, 15, 13, 45, 10);
        assert_eq!(a.start_of(t, TimeUnit::Day, Weekday::Mon), utc(2024, 6, 15, 0, 0, 0));
        assert_eq!(
            a.end_of(t, TimeUnit::Day, Weekday::Mon),
            ms(utc(2024, 6, 15, 23, 59, 59), 999)
        );
    }

    #[test]
    fn test_week_respects_week_start() {
        let a = ChronoAdapter::utc();
        // Wednesday 2026-02-18
        let t = utc(2026, 2, 18, 9, 0, 0);
        assert_eq!(a.start_of(t, TimeUnit::Week, Weekday::Mon), utc(2026, 2, 16, 0, 0, 0));
        assert_eq!(a.start_of(t, TimeUnit::Week, Weekday::Sun), utc(2026, 2, 15, 0, 0, 0));
        assert_eq!(
            a.end_of(t, TimeUnit::Week, Weekday::Sun),
            ms(utc(2026, 2, 21, 23, 59, 59), 999)
        );
        assert_eq!(a.start_of(t, TimeUnit::Week, Weekday::Thu), utc(2026, 2, 12, 0, 0, 0));
    }

    #[test]
    fn test_quarter_boundaries() {
        let a = ChronoAdapter::utc();
        let t = utc(2026, 5, 20, 0, 0, 0);
        assert_eq!(a.start_of(t, TimeUnit::Quarter, Weekday::Mon), utc(2026, 4, 1, 0, 0, 0));
        assert_eq!(
            a.end_of(t, TimeUnit::Quarter, Weekday::Mon),
            ms(utc(2026, 6, 30, 23, 59, 59), 999)
        );
    }

    #[test]
    fn test_leap_february_end() {
        let a = ChronoAdapter::utc();
        let leap = a.end_of(utc(2024, 2, 10, 0, 0, 0), TimeUnit::Month, Weekday::Mon);
        assert_eq!(leap.day(), 29);
        let common = a.end_of(utc(2023, 2, 10, 0, 0, 0), TimeUnit::Month, Weekday::Mon);
        assert_eq!(common.day(), 28);
    }

    #[test]
    fn test_sub_day_boundaries() {
        let a = ChronoAdapter::utc();
        let t = ms(utc(2024, 1, 1, 10, 42, 17), 250);
        assert_eq!(a.start_of(t, TimeUnit::Hour, Weekday::Mon), utc(2024, 1, 1, 10, 0, 0));
        assert_eq!(a.start_of(t, TimeUnit::Minute, Weekday::Mon), utc(2024, 1, 1, 10, 42, 0));
        assert_eq!(a.start_of(t, TimeUnit::Second, Weekday::Mon), utc(2024, 1, 1, 10, 42, 17));
        assert_eq!(
            a.end_of(t, TimeUnit::Second, Weekday::Mon),
            ms(utc(2024, 1, 1, 10, 42, 17), 999)
        );
    }

    // ── translation ─────────────────────────────────────────────────────

    #[test]
    fn test_add_month_clamps_to_month_end() {
        let a = ChronoAdapter::utc();
        let jan31 = utc(2024, 1, 31, 12, 0, 0);
        assert_eq!(a.add(jan31, 1, TimeUnit::Month), utc(2024, 2, 29, 12, 0, 0));
        assert_eq!(a.subtract(jan31, 2, TimeUnit::Month), utc(2023, 11, 30, 12, 0, 0));
        assert_eq!(a.add(jan31, 1, TimeUnit::Quarter), utc(2024, 4, 30, 12, 0, 0));
        assert_eq!(a.add(utc(2024, 2, 29, 0, 0, 0), 1, TimeUnit::Year), utc(2025, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_add_saturates_out_of_range() {
        let a = ChronoAdapter::utc();
        let t = utc(2024, 1, 1, 0, 0, 0);
        assert_eq!(a.add(t, i64::MAX, TimeUnit::Second), DateTime::<Utc>::MAX_UTC);
        assert_eq!(a.add(t, i64::MIN, TimeUnit::Day), DateTime::<Utc>::MIN_UTC);
    }

    // ── DST ─────────────────────────────────────────────────────────────

    #[test]
    fn test_spring_forward_day_is_23_hours() {
        let a = ChronoAdapter::from_name("America/New_York").unwrap();
        // 2026-03-08 11:00 EDT
        let t = utc(2026, 3, 8, 15, 0, 0);
        let start = a.start_of(t, TimeUnit::Day, Weekday::Mon);
        let end = a.end_of(t, TimeUnit::Day, Weekday::Mon);
        assert_eq!(start, utc(2026, 3, 8, 5, 0, 0)); // midnight EST
        assert_eq!(end, ms(utc(2026, 3, 9, 3, 59, 59), 999)); // 23:59:59.999 EDT
        assert_eq!((end - start).num_hours(), 22); // 22h 59m 59.999s
    }

    #[test]
    fn test_add_day_preserves_wall_clock_across_dst() {
        let a = ChronoAdapter::from_name("America/New_York").unwrap();
        // 2026-03-07 10:00 EST -> 2026-03-08 10:00 EDT
        let before = utc(2026, 3, 7, 15, 0, 0);
        assert_eq!(a.add(before, 1, TimeUnit::Day), utc(2026, 3, 8, 14, 0, 0));
        // Hours are absolute
        assert_eq!(a.add(before, 24, TimeUnit::Hour), utc(2026, 3, 8, 15, 0, 0));
    }

    #[test]
    fn test_repeated_hour_keeps_its_offset() {
        let a = ChronoAdapter::from_name("America/New_York").unwrap();
        // 2026-11-01: 01:00-02:00 local happens twice.
        let first = utc(2026, 11, 1, 5, 30, 0); // 01:30 EDT
        let second = utc(2026, 11, 1, 6, 30, 0); // 01:30 EST
        assert_eq!(a.start_of(first, TimeUnit::Hour, Weekday::Mon), utc(2026, 11, 1, 5, 0, 0));
        assert_eq!(a.start_of(second, TimeUnit::Hour, Weekday::Mon), utc(2026, 11, 1, 6, 0, 0));
        assert!(!a.is_same(first, second, TimeUnit::Hour, Weekday::Mon));
        assert!(a.is_same(first, second, TimeUnit::Day, Weekday::Mon));
    }

    #[test]
    fn test_midnight_gap_resolves_after_gap() {
        // Brazil skipped 00:00-01:00 local on 2018-11-04.
        let a = ChronoAdapter::from_name("America/Sao_Paulo").unwrap();
        let noon = utc(2018, 11, 4, 14, 0, 0); // 12:00 -02:00
        let start = a.start_of(noon, TimeUnit::Day, Weekday::Mon);
        assert_eq!(start, utc(2018, 11, 4, 3, 0, 0)); // 01:00 -02:00
    }

    #[test]
    fn test_half_hour_shift_starts_hour_at_transition() {
        // Lord Howe Island moves from +10:30 to +11:00 at 02:00 local on 2024-10-06
        // (15:30Z on 2024-10-05); local 02:00-02:30 does not exist.
        let a = ChronoAdapter::from_name("Australia/Lord_Howe").unwrap();
        let transition = utc(2024, 10, 5, 15, 30, 0);
        let before = utc(2024, 10, 5, 15, 15, 0); // 01:45 +10:30
        let after = utc(2024, 10, 5, 15, 40, 0); // 02:40 +11:00

        assert_eq!(a.start_of(before, TimeUnit::Hour, Weekday::Mon), utc(2024, 10, 5, 14, 30, 0));
        assert_eq!(a.end_of(before, TimeUnit::Hour, Weekday::Mon), ms(transition, -1));
        assert_eq!(a.start_of(after, TimeUnit::Hour, Weekday::Mon), transition);
        assert_eq!(a.start_of(transition, TimeUnit::Hour, Weekday::Mon), transition);
        assert_eq!(a.end_of(after, TimeUnit::Hour, Weekday::Mon), ms(utc(2024, 10, 5, 16, 0, 0), -1));
    }

    // ── enumeration ─────────────────────────────────────────────────────

    #[test]
    fn test_each_interval_months_of_year() {
        let a = ChronoAdapter::utc();
        let start = utc(2024, 1, 1, 0, 0, 0);
        let end = ms(utc(2024, 12, 31, 23, 59, 59), 999);
        let months: Vec<_> = a.each_interval(start, end, TimeUnit::Month, Weekday::Mon).collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[11], utc(2024, 12, 1, 0, 0, 0));
    }

    #[test]
    fn test_each_interval_includes_partial_first_unit() {
        let a = ChronoAdapter::utc();
        // Weeks overlapping January 2024 (Monday start): Jan 1 is a Monday.
        let start = utc(2024, 1, 1, 0, 0, 0);
        let end = ms(utc(2024, 1, 31, 23, 59, 59), 999);
        let weeks: Vec<_> = a.each_interval(start, end, TimeUnit::Week, Weekday::Sun).collect();
        assert_eq!(weeks[0], utc(2023, 12, 31, 0, 0, 0));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn test_each_interval_empty_for_reversed_range() {
        let a = ChronoAdapter::utc();
        let t = utc(2024, 1, 1, 0, 0, 0);
        let later = utc(2024, 2, 1, 0, 0, 0);
        assert_eq!(a.each_interval(later, t, TimeUnit::Day, Weekday::Mon).count(), 0);
    }

    #[test]
    fn test_year_month_uses_local_calendar() {
        let a = ChronoAdapter::from_name("Asia/Tokyo").unwrap();
        // 2024-03-31 20:00Z is already April 1 in Tokyo.
        assert_eq!(a.year_month(utc(2024, 3, 31, 20, 0, 0)), (2024, 4));
    }

    #[test]
    fn test_invalid_timezone_returns_error() {
        let err = ChronoAdapter::from_name("Invalid/Zone").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }
}
