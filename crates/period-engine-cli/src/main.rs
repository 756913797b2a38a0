mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use period_engine::{
    create_period, divide, go, is_same, merge, next, previous, split, zoom_out, zoom_to,
    CalendarDuration, ChronoAdapter, Period, SplitOptions, TemporalContext, Unit,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "period")]
#[command(about = "Calendar period arithmetic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (timezone, week_starts_on, max_iterations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA time zone, e.g. America/New_York (default UTC)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// First day of the week, 0 = Sunday .. 6 = Saturday (default 1)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=6))]
    week_starts_on: Option<u8>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the period of a unit containing a date
    Create { unit: Unit, date: String },

    /// Divide a period into contiguous children of a smaller unit
    Divide {
        unit: Unit,
        date: String,
        child: Unit,
    },

    /// The period after the one containing a date
    Next { unit: Unit, date: String },

    /// The period before the one containing a date
    Previous { unit: Unit, date: String },

    /// Move a number of periods forward (or back, if negative)
    Go {
        unit: Unit,
        date: String,
        #[arg(allow_negative_numbers = true)]
        steps: i64,
    },

    /// Split a period by unit, count, or duration (exactly one)
    Split {
        unit: Unit,
        date: String,
        #[arg(long)]
        by: Option<Unit>,
        #[arg(long)]
        count: Option<usize>,
        /// Composite duration, e.g. "1w2d" or "36 hours"
        #[arg(long)]
        duration: Option<CalendarDuration>,
    },

    /// Merge the periods containing each date into one
    Merge {
        unit: Unit,
        #[arg(required = true)]
        dates: Vec<String>,
        /// Force the merged unit
        #[arg(long)]
        into: Option<Unit>,
    },

    /// Whether a period contains an instant
    Contains {
        unit: Unit,
        date: String,
        instant: String,
    },

    /// Whether two dates fall in the same unit
    Same { unit: Unit, a: String, b: String },

    /// Rebuild a period at a coarser unit
    ZoomOut {
        unit: Unit,
        date: String,
        target: Unit,
    },

    /// Rebuild a period at any unit
    ZoomTo {
        unit: Unit,
        date: String,
        target: Unit,
    },
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    }
    .with_overrides(cli.timezone.clone(), cli.week_starts_on);

    let adapter = config.adapter()?;
    let options = config.options()?;
    debug!(timezone = %adapter.timezone(), ?options, "configured");

    let mut ctx = TemporalContext::with_options(&adapter, Utc::now(), options);
    run(&mut ctx, &adapter, cli.command)
}

fn run(ctx: &mut TemporalContext<'_>, adapter: &ChronoAdapter, command: Commands) -> Result<()> {
    match command {
        Commands::Create { unit, date } => print_json(&period_at(ctx, adapter, unit, &date)?),
        Commands::Divide { unit, date, child } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            print_json(&divide(ctx, &period, child)?)
        }
        Commands::Next { unit, date } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            print_json(&next(ctx, &period)?)
        }
        Commands::Previous { unit, date } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            print_json(&previous(ctx, &period)?)
        }
        Commands::Go { unit, date, steps } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            print_json(&go(ctx, &period, steps)?)
        }
        Commands::Split {
            unit,
            date,
            by,
            count,
            duration,
        } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            let options = SplitOptions {
                by,
                count,
                duration,
            };
            print_json(&split(ctx, &period, options)?)
        }
        Commands::Merge { unit, dates, into } => {
            let periods = dates
                .iter()
                .map(|raw| period_at(ctx, adapter, unit, raw))
                .collect::<Result<Vec<_>>>()?;
            print_json(&merge(ctx, &periods, into))
        }
        Commands::Contains {
            unit,
            date,
            instant,
        } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            let instant = parse_date(adapter, &instant)?;
            print_json(&json!({ "period": period, "contains": period.contains(&instant) }))
        }
        Commands::Same { unit, a, b } => {
            let a = period_at(ctx, adapter, unit, &a)?;
            let b = period_at(ctx, adapter, unit, &b)?;
            print_json(&json!({ "same": is_same(ctx, Some(&a), Some(&b), unit) }))
        }
        Commands::ZoomOut { unit, date, target } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            let zoomed = zoom_out(ctx, &period, target);
            print_json(&json!({ "period": zoomed, "browsing": ctx.browsing() }))
        }
        Commands::ZoomTo { unit, date, target } => {
            let period = period_at(ctx, adapter, unit, &date)?;
            let zoomed = zoom_to(ctx, &period, target);
            print_json(&json!({ "period": zoomed, "browsing": ctx.browsing() }))
        }
    }
}

fn period_at(
    ctx: &TemporalContext<'_>,
    adapter: &ChronoAdapter,
    unit: Unit,
    raw: &str,
) -> Result<Period> {
    Ok(create_period(ctx, unit, parse_date(adapter, raw)?))
}

/// RFC 3339, or `YYYY-MM-DD` as local midnight in the adapter's zone.
fn parse_date(adapter: &ChronoAdapter, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}': expected RFC 3339 or YYYY-MM-DD"))?;
    Ok(adapter.start_of_local_date(day))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let adapter = ChronoAdapter::utc();
        let instant = parse_date(&adapter, "2024-03-10T12:00:00+02:00").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_plain_date_is_local_midnight() {
        let adapter = ChronoAdapter::from_name("Asia/Tokyo").unwrap();
        let instant = parse_date(&adapter, "2024-03-10").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 9, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let adapter = ChronoAdapter::utc();
        let err = parse_date(&adapter, "next tuesday").unwrap_err();
        assert!(err.to_string().contains("expected RFC 3339 or YYYY-MM-DD"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
