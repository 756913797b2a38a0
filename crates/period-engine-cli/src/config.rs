//! Optional TOML configuration for the `period` binary.
//!
//! ```toml
//! timezone = "Europe/Berlin"
//! week_starts_on = 0      # 0 = Sunday .. 6 = Saturday
//! max_iterations = 50000
//! ```
//!
//! Every key is optional; command-line flags override file values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use period_engine::{week_start_from_index, ChronoAdapter, TemporalOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// IANA zone name; UTC when unset.
    pub timezone: Option<String>,
    pub week_starts_on: Option<u8>,
    pub max_iterations: Option<usize>,
}

impl CliConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Replace file values with any flags given on the command line.
    pub fn with_overrides(mut self, timezone: Option<String>, week_starts_on: Option<u8>) -> Self {
        if timezone.is_some() {
            self.timezone = timezone;
        }
        if week_starts_on.is_some() {
            self.week_starts_on = week_starts_on;
        }
        self
    }

    pub fn adapter(&self) -> Result<ChronoAdapter> {
        match &self.timezone {
            Some(name) => Ok(ChronoAdapter::from_name(name)?),
            None => Ok(ChronoAdapter::utc()),
        }
    }

    pub fn options(&self) -> Result<TemporalOptions> {
        let mut options = TemporalOptions::default();
        if let Some(index) = self.week_starts_on {
            options.week_starts_on = week_start_from_index(index)?;
        }
        if let Some(limit) = self.max_iterations {
            options.max_iterations = limit;
        }
        Ok(options)
    }
}
