//! Typed view over the `schedule` JSON column of a saved query.
//!
//! Only the `until` key matters for reporting. Everything else in the stored
//! object (interval, time of day, day of week...) is ignored here.

use chrono::NaiveDate;
use serde_json::Value;

use super::time::parse_date;

/// Expiry marker of a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Until {
    /// No `until` key, or a falsy value (`null`, `""`, `false`, `0`...).
    Absent,
    /// Well-formed `YYYY-MM-DD` expiry date.
    Date(NaiveDate),
    /// Present but not readable as a date: wrong format or wrong JSON type.
    Unparsable(String),
}

impl Until {
    fn from_json(value: &Value) -> Self {
        if !is_truthy(value) {
            return Until::Absent;
        }
        match value {
            Value::String(raw) => match parse_date(raw) {
                Ok(date) => Until::Date(date),
                Err(_) => Until::Unparsable(raw.clone()),
            },
            other => Until::Unparsable(other.to_string()),
        }
    }
}

/// A query schedule as far as activity reporting is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub until: Until,
}

impl Schedule {
    /// A schedule that never expires.
    pub fn open_ended() -> Self {
        Self {
            until: Until::Absent,
        }
    }

    /// A schedule expiring on `until`.
    pub fn until(until: NaiveDate) -> Self {
        Self {
            until: Until::Date(until),
        }
    }

    /// Build from the stored JSON value.
    ///
    /// Returns `None` for values that do not mark a query as scheduled:
    /// `null` and falsy values such as `{}`. Truthy values that are not
    /// objects carry no `until` and never expire.
    pub fn from_json(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }
        let until = match value {
            Value::Object(map) => map.get("until").map(Until::from_json).unwrap_or(Until::Absent),
            _ => Until::Absent,
        };
        Some(Self { until })
    }

    /// Whether the schedule was running on `day`.
    ///
    /// The expiry date itself is not active. An unreadable expiry never
    /// deactivates the schedule.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        match &self.until {
            Until::Absent | Until::Unparsable(_) => true,
            Until::Date(until) => *until > day,
        }
    }
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays and
/// objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
