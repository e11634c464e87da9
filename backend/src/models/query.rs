//! Saved query records as stored by the repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schedule::Schedule;
use crate::define_id_type;

define_id_type!(i64, QueryId);

/// A saved query row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_archived: bool,
    /// Raw schedule document; `None` is SQL `NULL`.
    pub schedule: Option<Value>,
}

/// Insert payload for a saved query.
///
/// This is also the element type of local seed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuery {
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub schedule: Option<Value>,
}

impl NewQuery {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_at,
            is_archived: false,
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, schedule: Value) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn archived(mut self) -> Self {
        self.is_archived = true;
        self
    }
}

/// Row shape returned by the schedule statistics fetch.
///
/// Rows are already restricted to non-archived queries whose schedule is
/// present and not the JSON literal `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledQueryRecord {
    pub id: QueryId,
    pub created_at: DateTime<Utc>,
    pub schedule: Value,
}

/// A scheduled query with its schedule decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledQuery {
    pub id: QueryId,
    pub created_at: DateTime<Utc>,
    pub schedule: Schedule,
}

impl ScheduledQueryRecord {
    /// Decode the schedule; `None` when it does not mark the query as scheduled.
    pub fn decode(&self) -> Option<ScheduledQuery> {
        Schedule::from_json(&self.schedule).map(|schedule| ScheduledQuery {
            id: self.id,
            created_at: self.created_at,
            schedule,
        })
    }
}

/// Whether a stored schedule value passes the storage-level filter
/// (present and not the JSON literal `null`).
pub fn has_schedule_document(schedule: Option<&Value>) -> bool {
    matches!(schedule, Some(value) if !value.is_null())
}
