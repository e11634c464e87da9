//! Calendar helpers: date parsing, inclusive date ranges and the clock seam.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire format for calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the default reporting window, in days before "today".
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// A string that is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a YYYY-MM-DD date: {0:?}")]
pub struct DateParseError(pub String);

/// Parse a `YYYY-MM-DD` calendar date.
///
/// The year must be exactly four digits; month and day may drop their
/// leading zero (`2024-6-1`). Signs and surrounding whitespace are rejected.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateParseError> {
    if !has_date_shape(value) {
        return Err(DateParseError(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DateParseError(value.to_string()))
}

fn has_date_shape(value: &str) -> bool {
    fn digits(part: &str, min: usize, max: usize) -> bool {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    }

    let mut parts = value.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
        }
        _ => false,
    }
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The instant a calendar day begins, in UTC.
///
/// Creation timestamps are compared against this instant, so a query created
/// at 10:00 on day D is first counted on D + 1.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive range of calendar days.
///
/// A range whose `start` is after its `end` is valid and empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - DEFAULT_LOOKBACK_DAYS, today]`.
    pub fn trailing(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, today)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of days covered, both ends included.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.end - self.start).num_days() + 1) as usize
        }
    }

    /// Days in ascending order, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Source of the current instant.
///
/// Handlers never read the system clock directly; the server wires
/// [`SystemClock`] and tests wire [`FixedClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze the clock at midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(start_of_day(date))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
