//! Period-of-year grouping keys derived from time coordinates

use crate::calendar::CalendarDate;
use crate::errors::{Result, RuClimError};
use crate::labeled_array::Coordinate;
use std::fmt;
use std::str::FromStr;

/// Granularity a climatology groups time steps by
///
/// Only month-sized or coarser periods are supported. Sub-monthly groupings
/// such as `day`, `dayofyear` or `hour` are rejected with
/// [`RuClimError::InvalidPeriod`], since the weights are month lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Month of year, 1..=12
    Month,
    /// Meteorological season: DJF, MAM, JJA, SON
    Season,
    /// Calendar quarter, 1..=4
    Quarter,
    /// Calendar year
    Year,
}

impl Period {
    /// Name of the period, also used as the name of the resulting axis
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Season => "season",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Grouping key of `date`
    #[must_use]
    pub fn key(self, date: CalendarDate) -> PeriodKey {
        match self {
            Self::Month => PeriodKey::Number(i64::from(date.month())),
            Self::Season => PeriodKey::Label(season_of(date.month())),
            Self::Quarter => PeriodKey::Number(i64::from((date.month() - 1) / 3 + 1)),
            Self::Year => PeriodKey::Number(i64::from(date.year())),
        }
    }

    /// Coordinate labelling an axis of grouped `keys`
    #[must_use]
    pub fn coordinate(self, keys: &[PeriodKey]) -> Coordinate {
        match self {
            Self::Season => Coordinate::labels(keys.iter().map(ToString::to_string).collect()),
            _ => Coordinate::numeric(
                keys.iter()
                    .map(|k| match k {
                        #[allow(clippy::cast_precision_loss)]
                        PeriodKey::Number(n) => *n as f64,
                        PeriodKey::Label(_) => f64::NAN,
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = RuClimError;

    /// Accepts `month`, `season`, `quarter` and `year`, case-insensitively and
    /// optionally prefixed with `time.`
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let name = lowered.strip_prefix("time.").unwrap_or(&lowered);
        match name {
            "month" => Ok(Self::Month),
            "season" => Ok(Self::Season),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(RuClimError::InvalidPeriod {
                period: s.to_string(),
            }),
        }
    }
}

/// Label of one period group. Orders numerically, and seasons alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Number(i64),
    Label(&'static str),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(l) => f.write_str(l),
        }
    }
}

fn season_of(month: u32) -> &'static str {
    match month {
        12 | 1 | 2 => "DJF",
        3..=5 => "MAM",
        6..=8 => "JJA",
        _ => "SON",
    }
}
