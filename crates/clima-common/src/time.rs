//! Calendar vocabulary and clock abstraction for climatology.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ClimError;

/// Source of the current time.
///
/// Cache freshness checks go through this trait instead of reading the wall
/// clock directly, so tests can age a cache without touching file timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Meteorological seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// December, January, February
    Djf,
    /// March, April, May
    Mam,
    /// June, July, August
    Jja,
    /// September, October, November
    Son,
}

impl Season {
    /// All seasons in canonical calendar order.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Season containing the given calendar month (1-12).
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Mam,
            6..=8 => Season::Jja,
            9..=11 => Season::Son,
            _ => Season::Djf,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Djf => "DJF",
            Season::Mam => "MAM",
            Season::Jja => "JJA",
            Season::Son => "SON",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Calendar grouping applied when reducing a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimatologyPeriod {
    /// Group by calendar month (1-12).
    Monthly,
    /// Group by meteorological season (DJF, MAM, JJA, SON).
    Seasonal,
    /// Mean of yearly means, collapsing the time axis entirely.
    Annual,
}

impl FromStr for ClimatologyPeriod {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(ClimatologyPeriod::Monthly),
            "seasonal" => Ok(ClimatologyPeriod::Seasonal),
            "annual" => Ok(ClimatologyPeriod::Annual),
            other => Err(ClimError::InvalidArgument(format!(
                "Invalid time period '{}'. Choose from 'monthly', 'seasonal', or 'annual'.",
                other
            ))),
        }
    }
}

impl fmt::Display for ClimatologyPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimatologyPeriod::Monthly => write!(f, "monthly"),
            ClimatologyPeriod::Seasonal => write!(f, "seasonal"),
            ClimatologyPeriod::Annual => write!(f, "annual"),
        }
    }
}
