//! CF calendars, calendar dates and time-offset decoding
//!
//! Climate model output rarely uses the plain Gregorian calendar: `noleap`,
//! `360_day` and friends are common, and the length of a month (the weight
//! of a monthly time step) depends on which one is in use. This module keeps
//! dates as plain `(year, month, day)` triples so that dates such as
//! February 30 in a `360_day` calendar remain representable, and does the
//! day arithmetic per calendar.
//!
//! The `standard`/`gregorian` calendar is treated as proleptic Gregorian;
//! dates before the 1582 switch are not shifted.

use crate::errors::{Result, RuClimError};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: f64 = 86_400.0;

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendars defined by the CF conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Calendar {
    /// `standard` / `gregorian`
    #[default]
    Standard,
    /// `proleptic_gregorian`
    ProlepticGregorian,
    /// `julian`: every fourth year is a leap year
    Julian,
    /// `noleap` / `365_day`
    NoLeap,
    /// `all_leap` / `366_day`
    AllLeap,
    /// `360_day`: twelve months of thirty days
    Day360,
}

impl Calendar {
    /// CF name of the calendar
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ProlepticGregorian => "proleptic_gregorian",
            Self::Julian => "julian",
            Self::NoLeap => "noleap",
            Self::AllLeap => "all_leap",
            Self::Day360 => "360_day",
        }
    }

    /// Whether `year` has a February 29 in this calendar
    #[must_use]
    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            Self::Standard | Self::ProlepticGregorian => {
                year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
            }
            Self::Julian => year.rem_euclid(4) == 0,
            Self::AllLeap => true,
            Self::NoLeap | Self::Day360 => false,
        }
    }

    /// Number of days in `month` (1..=12) of `year`
    ///
    /// Returns 0 for a month outside 1..=12.
    #[must_use]
    pub fn days_in_month(self, year: i32, month: u32) -> u32 {
        if !(1..=12).contains(&month) {
            return 0;
        }
        if self == Self::Day360 {
            return 30;
        }
        let base = MONTH_LENGTHS[(month - 1) as usize];
        if month == 2 && self.is_leap_year(year) {
            base + 1
        } else {
            base
        }
    }

    /// Number of days in `year`
    #[must_use]
    pub fn days_in_year(self, year: i32) -> u32 {
        (1..=12).map(|m| self.days_in_month(year, m)).sum()
    }

    /// Days from 0000-01-01 to January 1 of `year`
    fn days_before_year(self, year: i32) -> i64 {
        let y = i64::from(year);
        match self {
            Self::Standard | Self::ProlepticGregorian => {
                365 * y + (y + 3).div_euclid(4) - (y + 99).div_euclid(100) + (y + 399).div_euclid(400)
            }
            Self::Julian => 365 * y + (y + 3).div_euclid(4),
            Self::NoLeap => 365 * y,
            Self::AllLeap => 366 * y,
            Self::Day360 => 360 * y,
        }
    }

    fn mean_year_length(self) -> f64 {
        match self {
            Self::Standard | Self::ProlepticGregorian => 365.2425,
            Self::Julian => 365.25,
            Self::NoLeap => 365.0,
            Self::AllLeap => 366.0,
            Self::Day360 => 360.0,
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Calendar {
    type Err = RuClimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Self::Standard),
            "proleptic_gregorian" => Ok(Self::ProlepticGregorian),
            "julian" => Ok(Self::Julian),
            "noleap" | "no_leap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            other => Err(RuClimError::InvalidTime {
                reason: format!("unsupported calendar '{other}'"),
            }),
        }
    }
}

/// A day-resolution date in an arbitrary CF calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Creates a date, validating month and day against `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidTime`] if the month is outside 1..=12
    /// or the day does not exist in that month.
    pub fn new(calendar: Calendar, year: i32, month: u32, day: u32) -> Result<Self> {
        let max_day = calendar.days_in_month(year, month);
        if max_day == 0 || day == 0 || day > max_day {
            return Err(RuClimError::InvalidTime {
                reason: format!("{year:04}-{month:02}-{day:02} does not exist in the {calendar} calendar"),
            });
        }
        Ok(Self { year, month, day })
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    /// Days since 0000-01-01 in `calendar`
    #[must_use]
    pub fn ordinal(self, calendar: Calendar) -> i64 {
        let before_month: u32 = (1..self.month)
            .map(|m| calendar.days_in_month(self.year, m))
            .sum();
        calendar.days_before_year(self.year) + i64::from(before_month) + i64::from(self.day) - 1
    }

    /// Inverse of [`CalendarDate::ordinal`]
    #[must_use]
    pub fn from_ordinal(calendar: Calendar, ordinal: i64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let mut year = (ordinal as f64 / calendar.mean_year_length()).floor() as i32;
        while calendar.days_before_year(year) > ordinal {
            year -= 1;
        }
        while calendar.days_before_year(year + 1) <= ordinal {
            year += 1;
        }

        let mut remaining = ordinal - calendar.days_before_year(year);
        let mut month = 1;
        while month < 12 {
            let len = i64::from(calendar.days_in_month(year, month));
            if remaining < len {
                break;
            }
            remaining -= len;
            month += 1;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let day = remaining as u32 + 1;
        Self { year, month, day }
    }

    /// Shifts the date by `days` (may be negative)
    #[must_use]
    pub fn add_days(self, calendar: Calendar, days: i64) -> Self {
        Self::from_ordinal(calendar, self.ordinal(calendar) + days)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Unit part of a CF `"<unit> since <date>"` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Days => SECONDS_PER_DAY,
            Self::Hours => 3_600.0,
            Self::Minutes => 60.0,
            Self::Seconds => 1.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Some(Self::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            _ => None,
        }
    }
}

/// Parsed CF time units such as `"days since 1850-01-01 00:00:00"`
#[derive(Debug, Clone, PartialEq)]
pub struct CfTimeUnits {
    unit: TimeUnit,
    reference: CalendarDate,
    /// Time of day of the reference instant, in seconds
    reference_seconds: f64,
}

impl CfTimeUnits {
    /// `"days since <date>"` with a midnight reference
    #[must_use]
    pub const fn days_since(reference: CalendarDate) -> Self {
        Self {
            unit: TimeUnit::Days,
            reference,
            reference_seconds: 0.0,
        }
    }

    /// Parses a CF units string, validating the reference date in `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidTime`] if the string is not of the form
    /// `"<unit> since <date>[ <time>]"` or the date is invalid.
    pub fn parse(units: &str, calendar: Calendar) -> Result<Self> {
        let invalid = |detail: &str| RuClimError::InvalidTime {
            reason: format!("unexpected time units '{units}': {detail}"),
        };

        let mut parts = units.split_whitespace();
        let unit = parts
            .next()
            .and_then(TimeUnit::parse)
            .ok_or_else(|| invalid("unknown unit"))?;
        if !parts.next().is_some_and(|w| w.eq_ignore_ascii_case("since")) {
            return Err(invalid("missing 'since'"));
        }
        let stamp = parts.next().ok_or_else(|| invalid("missing reference date"))?;

        // "1850-01-01T00:00:00" and "1850-01-01 00:00:00" are both common
        let (date_part, time_part) = match stamp.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (stamp, parts.next()),
        };

        let fields: Vec<&str> = date_part.split('-').collect();
        let [y, m, d] = fields.as_slice() else {
            return Err(invalid("reference date is not YYYY-MM-DD"));
        };
        let year = y.parse::<i32>().map_err(|_| invalid("bad year"))?;
        let month = m.parse::<u32>().map_err(|_| invalid("bad month"))?;
        let day = d.parse::<u32>().map_err(|_| invalid("bad day"))?;
        let reference = CalendarDate::new(calendar, year, month, day)?;

        let reference_seconds = match time_part {
            Some(t) => parse_time_of_day(t).ok_or_else(|| invalid("bad time of day"))?,
            None => 0.0,
        };

        Ok(Self {
            unit,
            reference,
            reference_seconds,
        })
    }

    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub const fn reference(&self) -> CalendarDate {
        self.reference
    }

    /// Converts offsets into dates; the time of day is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidTime`] for non-finite offsets.
    pub fn decode(&self, offsets: &[f64], calendar: Calendar) -> Result<Vec<CalendarDate>> {
        let base = self.reference.ordinal(calendar);
        offsets
            .iter()
            .map(|&offset| {
                if !offset.is_finite() {
                    return Err(RuClimError::InvalidTime {
                        reason: format!("non-finite time offset {offset}"),
                    });
                }
                let days = (self.reference_seconds + offset * self.unit.seconds()) / SECONDS_PER_DAY;
                #[allow(clippy::cast_possible_truncation)]
                let whole_days = days.floor() as i64;
                Ok(CalendarDate::from_ordinal(calendar, base + whole_days))
            })
            .collect()
    }

    /// Converts midnight dates back into offsets in these units
    #[must_use]
    pub fn encode(&self, dates: &[CalendarDate], calendar: Calendar) -> Vec<f64> {
        let base = self.reference.ordinal(calendar);
        dates
            .iter()
            .map(|date| {
                #[allow(clippy::cast_precision_loss)]
                let seconds = (date.ordinal(calendar) - base) as f64 * SECONDS_PER_DAY;
                (seconds - self.reference_seconds) / self.unit.seconds()
            })
            .collect()
    }
}

impl fmt::Display for CfTimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = self.reference_seconds.floor() as u32;
        write!(
            f,
            "{} since {} {:02}:{:02}:{:02}",
            self.unit.as_str(),
            self.reference,
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

fn parse_time_of_day(s: &str) -> Option<f64> {
    let s = s.trim_end_matches('Z');
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .map(|t| f64::from(t.num_seconds_from_midnight()) + f64::from(t.nanosecond()) * 1e-9)
}
