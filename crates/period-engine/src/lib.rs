//! # period-engine
//!
//! Calendar periods as plain values.
//!
//! A [`Period`] is an inclusive span of time tagged with the [`Unit`] that
//! produced it. The engine builds periods from a reference instant, divides
//! them into smaller units, merges them back (recognising whole weeks and
//! quarters), splits them by count or duration, steps through them, and
//! zooms between levels. All calendar arithmetic goes through an
//! [`Adapter`], so month lengths, leap years, week-start configuration, and
//! DST come from one place.
//!
//! Every operation is a synchronous, pure function of its inputs and the
//! adapter, except the two cursors on [`TemporalContext`] that the zoom
//! operations move.
//!
//! ## Modules
//!
//! - [`unit`] — Period units and adapter-level calendar units
//! - [`adapter`] — The calendar capability trait
//! - [`chrono_adapter`] — `chrono`/`chrono-tz` implementation of the adapter
//! - [`period`] — The period value
//! - [`context`] — Adapter, options, and the browsing/now cursors
//! - [`create`] — Build a period of a unit around an instant
//! - [`divide`] — Period → contiguous children of a smaller unit
//! - [`merge`] — Periods → one period, detecting natural weeks and quarters
//! - [`split`] — Partition by unit, count, or duration
//! - [`navigate`] — Next, previous, and multi-step moves
//! - [`compare`] — Containment and same-bucket predicates
//! - [`zoom`] — Zoom in, out, and sideways while tracking the browsing cursor
//! - [`duration`] — Composite calendar amounts
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use period_engine::{create_period, divide, merge, next, ChronoAdapter, TemporalContext, Unit};
//!
//! let adapter = ChronoAdapter::utc();
//! let now = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
//! let ctx = TemporalContext::new(&adapter, now);
//!
//! let week = create_period(&ctx, Unit::Week, now);
//! let days = divide(&ctx, &week, Unit::Day).unwrap();
//! assert_eq!(days.len(), 7);
//!
//! // Seven aligned days merge back into the week.
//! assert_eq!(merge(&ctx, &days, None), Some(week));
//!
//! let following = next(&ctx, &week).unwrap();
//! assert_eq!(following.start(), week.end() + chrono::TimeDelta::milliseconds(1));
//! ```

pub mod adapter;
pub mod chrono_adapter;
pub mod compare;
pub mod context;
pub mod create;
pub mod divide;
pub mod duration;
pub mod error;
pub mod merge;
pub mod navigate;
pub mod period;
pub mod split;
pub mod unit;
pub mod zoom;

pub use adapter::{Adapter, Instants};
pub use chrono_adapter::ChronoAdapter;
pub use compare::{contains, is_same};
pub use context::{week_start_from_index, TemporalContext, TemporalOptions, DEFAULT_MAX_ITERATIONS};
pub use create::{create_period, to_period, STABLE_MONTH_DAYS};
pub use divide::divide;
pub use duration::CalendarDuration;
pub use error::{PeriodError, Result};
pub use merge::merge;
pub use navigate::{go, next, previous};
pub use period::{Containable, Period, RESOLUTION};
pub use split::{split, split_with, SplitOptions, SplitStrategy};
pub use unit::{TimeUnit, Unit};
pub use zoom::{zoom_in, zoom_out, zoom_to};
