//! Composite calendar amounts ("2 weeks", "1mo15d") applied through an adapter.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapter::Adapter;
use crate::error::PeriodError;
use crate::unit::{TimeUnit, Unit};

/// A signed amount of calendar time made of independent components.
///
/// Components are applied largest first, each through the adapter, so
/// `1mo1d` from Jan 31 is Feb 29 + 1 day = Mar 1 (in a leap year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDuration {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarDuration {
    /// `amount` of a single calendar unit (a quarter is three months).
    pub fn of(amount: i64, unit: TimeUnit) -> Self {
        let mut d = Self::default();
        match unit {
            TimeUnit::Year => d.years = amount,
            TimeUnit::Quarter => d.months = amount.saturating_mul(3),
            TimeUnit::Month => d.months = amount,
            TimeUnit::Week => d.weeks = amount,
            TimeUnit::Day => d.days = amount,
            TimeUnit::Hour => d.hours = amount,
            TimeUnit::Minute => d.minutes = amount,
            TimeUnit::Second => d.seconds = amount,
        }
        d
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    fn components(&self) -> [(i64, TimeUnit); 7] {
        [
            (self.years, TimeUnit::Year),
            (self.months, TimeUnit::Month),
            (self.weeks, TimeUnit::Week),
            (self.days, TimeUnit::Day),
            (self.hours, TimeUnit::Hour),
            (self.minutes, TimeUnit::Minute),
            (self.seconds, TimeUnit::Second),
        ]
    }

    /// Translate `date` by this duration, largest component first.
    pub fn apply(&self, adapter: &dyn Adapter, date: DateTime<Utc>) -> DateTime<Utc> {
        self.components()
            .into_iter()
            .filter(|(amount, _)| *amount != 0)
            .fold(date, |acc, (amount, unit)| adapter.add(acc, amount, unit))
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Token {
    Sign(i64),
    Number(i64),
    Word(String),
}

fn tokenize(s: &str) -> Result<Vec<Token>, PeriodError> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            let mut buf = String::new();
            while let Some(&d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                buf.push(d);
                chars.next();
            }
            let n = buf
                .parse()
                .map_err(|_| PeriodError::InvalidDuration(format!("number too large in '{s}'")))?;
            tokens.push(Token::Number(n));
        } else if ch.is_alphabetic() {
            let mut buf = String::new();
            while let Some(&c) = chars.peek().filter(|c| c.is_alphabetic()) {
                buf.push(c);
                chars.next();
            }
            tokens.push(Token::Word(buf.to_lowercase()));
        } else if ch == '+' || ch == '-' {
            tokens.push(Token::Sign(if ch == '-' { -1 } else { 1 }));
            chars.next();
        } else if ch.is_whitespace() || ch == ',' {
            chars.next();
        } else {
            return Err(PeriodError::InvalidDuration(format!(
                "unexpected '{ch}' in '{s}'"
            )));
        }
    }
    Ok(tokens)
}

/// Map a component suffix to its unit. `m` is minutes; months are `mo`.
fn component_unit(word: &str) -> Option<TimeUnit> {
    match word {
        "m" => Some(TimeUnit::Minute),
        "mo" | "mos" => Some(TimeUnit::Month),
        other => other.parse::<Unit>().ok().and_then(|u| match u {
            Unit::StableMonth => None,
            _ => u.calendar(),
        }),
    }
}

impl FromStr for CalendarDuration {
    type Err = PeriodError;

    /// Parse a duration.
    ///
    /// One or more `<number><unit>` components, compact or spelled out:
    /// `"2w"`, `"+1y6mo"`, `"-3d12h"`, `"90m"`, `"2 weeks"`,
    /// `"1 month and 2 days"`, `"a week"`. A sign applies to its component
    /// and every later one until the next sign, so `"-3d12h"` is minus three
    /// days and twelve hours while `"1y-2d"` is one year minus two days.
    ///
    /// Suffixes: `y` years, `q` quarters, `mo` months, `w` weeks, `d` days,
    /// `h` hours, `m` minutes, `s` seconds, or any unit name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PeriodError::InvalidDuration("empty duration".to_string()));
        }

        let mut parsed = CalendarDuration::default();
        let mut found_any = false;
        let mut sign = 1i64;
        let mut dangling_sign = false;
        let mut tokens = tokenize(trimmed)?.into_iter();

        while let Some(token) = tokens.next() {
            let amount = match token {
                Token::Sign(next_sign) => {
                    if dangling_sign {
                        return Err(PeriodError::InvalidDuration(format!(
                            "repeated sign in '{s}'"
                        )));
                    }
                    sign = next_sign;
                    dangling_sign = true;
                    continue;
                }
                Token::Number(n) => n,
                Token::Word(w) if w == "a" || w == "an" => 1,
                Token::Word(w) if w == "and" && !dangling_sign => continue,
                Token::Word(w) => {
                    return Err(PeriodError::InvalidDuration(format!(
                        "expected number before '{w}' in '{s}'"
                    )));
                }
            };
            let unit = match tokens.next() {
                Some(Token::Word(w)) => component_unit(&w).ok_or_else(|| {
                    PeriodError::InvalidDuration(format!("unknown unit '{w}' in '{s}'"))
                })?,
                _ => {
                    return Err(PeriodError::InvalidDuration(format!(
                        "number without unit in '{s}'"
                    )));
                }
            };

            let part = CalendarDuration::of(amount.saturating_mul(sign), unit);
            parsed = parsed.saturating_add(&part);
            found_any = true;
            dangling_sign = false;
        }

        if dangling_sign {
            return Err(PeriodError::InvalidDuration(format!(
                "sign without component in '{s}'"
            )));
        }
        if !found_any {
            return Err(PeriodError::InvalidDuration(format!(
                "no valid components in '{s}'"
            )));
        }
        Ok(parsed)
    }
}

impl CalendarDuration {
    fn saturating_add(&self, other: &Self) -> Self {
        Self {
            years: self.years.saturating_add(other.years),
            months: self.months.saturating_add(other.months),
            weeks: self.weeks.saturating_add(other.weeks),
            days: self.days.saturating_add(other.days),
            hours: self.hours.saturating_add(other.hours),
            minutes: self.minutes.saturating_add(other.minutes),
            seconds: self.seconds.saturating_add(other.seconds),
        }
    }
}

impl TryFrom<String> for CalendarDuration {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDuration> for String {
    fn from(d: CalendarDuration) -> Self {
        d.to_string()
    }
}

impl fmt::Display for CalendarDuration {
    /// Compact form, e.g. `1y2mo3d`, `-2w3h` or `1y-2d`.
    ///
    /// A sign is written only where it changes, which is the form
    /// [`FromStr`] reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0s");
        }
        let suffixes = ["y", "mo", "w", "d", "h", "m", "s"];
        let mut negative = false;
        for ((amount, _), suffix) in self.components().into_iter().zip(suffixes) {
            if amount == 0 {
                continue;
            }
            if (amount < 0) != negative {
                negative = amount < 0;
                f.write_str(if negative { "-" } else { "+" })?;
            }
            write!(f, "{}{suffix}", amount.unsigned_abs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrono_adapter::ChronoAdapter;
    use chrono::TimeZone;

    #[test]
    fn test_parse_compact() {
        let d: CalendarDuration = "1y6mo2w3d4h5m6s".parse().unwrap();
        assert_eq!(
            d,
            CalendarDuration {
                years: 1,
                months: 6,
                weeks: 2,
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6,
            }
        );
    }

    #[test]
    fn test_parse_natural() {
        assert_eq!("2 weeks".parse::<CalendarDuration>().unwrap().weeks, 2);
        assert_eq!("a month".parse::<CalendarDuration>().unwrap().months, 1);
        let d: CalendarDuration = "1 month and 2 days".parse().unwrap();
        assert_eq!((d.months, d.days), (1, 2));
        assert_eq!("1 quarter".parse::<CalendarDuration>().unwrap().months, 3);
    }

    #[test]
    fn test_parse_sign_applies_to_all_components() {
        let d: CalendarDuration = "-1d12h".parse().unwrap();
        assert_eq!((d.days, d.hours), (-1, -12));
        assert_eq!(d.to_string(), "-1d12h");
        assert_eq!(d.to_string().parse::<CalendarDuration>().unwrap(), d);
    }

    #[test]
    fn test_mixed_signs_round_trip() {
        let d = CalendarDuration {
            years: 1,
            days: -2,
            ..CalendarDuration::default()
        };
        assert_eq!(d.to_string(), "1y-2d");
        assert_eq!("1y-2d".parse::<CalendarDuration>().unwrap(), d);

        let flipped = CalendarDuration {
            months: -1,
            days: 2,
            hours: 3,
            ..CalendarDuration::default()
        };
        assert_eq!(flipped.to_string(), "-1mo+2d3h");
        assert_eq!(flipped.to_string().parse::<CalendarDuration>().unwrap(), flipped);

        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(serde_json::from_str::<CalendarDuration>(&json).unwrap(), d);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "+", "3", "d", "2 fortnights", "2w!", "1 stableMonth", "1d-", "+-2d"] {
            let err = bad.parse::<CalendarDuration>().unwrap_err();
            assert!(matches!(err, PeriodError::InvalidDuration(_)), "{bad:?}: {err}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        let d: CalendarDuration = "2 weeks 3 hours".parse().unwrap();
        assert_eq!(d.to_string(), "2w3h");
        assert_eq!(d.to_string().parse::<CalendarDuration>().unwrap(), d);
    }

    #[test]
    fn test_apply_largest_first() {
        let adapter = ChronoAdapter::utc();
        let jan31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let d: CalendarDuration = "1mo1d".parse().unwrap();
        assert_eq!(
            d.apply(&adapter, jan31),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serde_as_string() {
        let d: CalendarDuration = serde_json::from_str("\"2w\"").unwrap();
        assert_eq!(d.weeks, 2);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2w\"");
    }
}
