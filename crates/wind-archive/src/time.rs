//! Time handling: base dates, units strings and the 1900 day-count normalization.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{ArchiveError, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Calendar origin of a time axis, to the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BaseDate {
    date: NaiveDate,
    hour: u32,
}

impl BaseDate {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ArchiveError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
        })?;
        if hour > 23 {
            return Err(ArchiveError::InvalidDate(format!("hour {} out of range", hour)));
        }
        Ok(Self { date, hour })
    }

    /// 1900-01-01 00h, the epoch of the sflux time axis.
    pub fn julian_epoch() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date"),
            hour: 0,
        }
    }

    /// 1970-01-01 00h.
    pub fn unix_epoch() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(1970, 1, 1).expect("1970-01-01 is a valid date"),
            hour: 0,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The same calendar date at 00h.
    pub fn at_midnight(&self) -> Self {
        Self {
            date: self.date,
            hour: 0,
        }
    }

    /// The hour as a fraction of a day.
    pub fn hour_fraction(&self) -> f64 {
        f64::from(self.hour) / 24.0
    }

    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.hour))
    }

    /// `[year, month, day, hour]`, the layout of the `base_date` attribute.
    pub fn to_array(&self) -> [i32; 4] {
        [
            self.year(),
            self.month() as i32,
            self.day() as i32,
            self.hour as i32,
        ]
    }

    /// CF units string for a day-valued axis starting at this date.
    pub fn days_since_units(&self) -> String {
        self.to_datetime()
            .format("days since %Y-%m-%d %H:%M:%S")
            .to_string()
    }

    /// Whole calendar days from `other` to `self`, ignoring the hour.
    pub fn days_after(&self, other: &BaseDate) -> i64 {
        (self.date - other.date).num_days()
    }
}

impl fmt::Display for BaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Shift a day-valued time axis from `base` onto the 1900-01-01 epoch.
///
/// The offset is the exact Gregorian day count between the two dates; the hour
/// of `base` does not take part.
pub fn time_to_julian(time: &[f64], base: BaseDate) -> (Vec<f64>, BaseDate) {
    let epoch = BaseDate::julian_epoch();
    let offset = base.days_after(&epoch) as f64;
    let shifted = time.iter().map(|t| t + offset).collect();
    (shifted, epoch)
}

/// Fractional days from `epoch` to `instant`.
pub fn days_since(instant: NaiveDateTime, epoch: BaseDate) -> f64 {
    (instant - epoch.to_datetime()).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Step size of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "days" | "day" | "d" => Some(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            _ => None,
        }
    }

    /// Number of this unit in one day.
    pub fn per_day(&self) -> f64 {
        match self {
            TimeUnit::Days => 1.0,
            TimeUnit::Hours => 24.0,
            TimeUnit::Minutes => 1_440.0,
            TimeUnit::Seconds => SECONDS_PER_DAY,
        }
    }
}

/// A parsed `"<unit> since <date>[ <time>]"` units attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub base: BaseDate,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self> {
        let invalid = |reason: &str| ArchiveError::InvalidUnits {
            units: units.to_string(),
            reason: reason.to_string(),
        };

        let lower = units.trim().to_ascii_lowercase();
        let (unit, origin) = lower
            .split_once(" since ")
            .ok_or_else(|| invalid("expected '<unit> since <date>'"))?;
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(|| invalid("unknown time unit"))?;

        let mut parts = origin.split_whitespace();
        let first = parts.next().ok_or_else(|| invalid("missing reference date"))?;
        let (date_part, time_part) = match first.split_once('t') {
            Some((date, time)) => (date, Some(time)),
            None => (first, parts.next()),
        };

        let ymd: Vec<&str> = date_part.split('-').collect();
        let [year, month, day] = ymd.as_slice() else {
            return Err(invalid("reference date must be YYYY-MM-DD"));
        };
        let year: i32 = year.parse().map_err(|_| invalid("bad year"))?;
        let month: u32 = month.parse().map_err(|_| invalid("bad month"))?;
        let day: u32 = day.parse().map_err(|_| invalid("bad day"))?;

        let hour = match time_part {
            Some(time) => parse_reference_hour(time).ok_or_else(|| {
                invalid("reference time must be a whole hour (HH[:00[:00]])")
            })?,
            None => 0,
        };

        let base = BaseDate::new(year, month, day, hour).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self { unit, base })
    }

    /// Convert raw axis values to days since `self.base`.
    pub fn to_days(&self, values: &[f64]) -> Vec<f64> {
        let per_day = self.unit.per_day();
        values.iter().map(|v| v / per_day).collect()
    }
}

fn parse_reference_hour(time: &str) -> Option<u32> {
    let time = time.trim_end_matches('z');
    let mut fields = time.split(':');
    let hour: u32 = fields.next()?.parse().ok()?;
    for rest in fields {
        let value: f64 = rest.parse().ok()?;
        if value != 0.0 {
            return None;
        }
    }
    Some(hour)
}

/// Parse a packed `YYYYMMDDHH` timestamp.
pub fn parse_packed_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    let invalid = || ArchiveError::InvalidTimestamp(text.to_string());
    if text.len() != 10 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = text[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = text[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = text[6..8].parse().map_err(|_| invalid())?;
    let hour: u32 = text[8..10].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(invalid)
}
