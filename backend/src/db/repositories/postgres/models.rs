use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::queries;
use crate::api::{NewQuery, Query, QueryId, ScheduledQueryRecord};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = queries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QueryRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_archived: bool,
    pub schedule: Option<Value>,
}

impl From<QueryRow> for Query {
    fn from(row: QueryRow) -> Self {
        Query {
            id: QueryId(row.id),
            name: row.name,
            created_at: row.created_at,
            is_archived: row.is_archived,
            schedule: row.schedule,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = queries)]
pub struct NewQueryRow {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_archived: bool,
    pub schedule: Option<Value>,
}

impl From<&NewQuery> for NewQueryRow {
    fn from(query: &NewQuery) -> Self {
        Self {
            name: query.name.clone(),
            created_at: query.created_at,
            is_archived: query.is_archived,
            schedule: query.schedule.clone(),
        }
    }
}

/// Projection used by the schedule statistics fetch.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = queries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduledQueryRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub schedule: Option<Value>,
}

impl ScheduledQueryRow {
    /// `None` only if the row slipped past the SQL filter without a document.
    pub fn into_record(self) -> Option<ScheduledQueryRecord> {
        self.schedule.map(|schedule| ScheduledQueryRecord {
            id: QueryId(self.id),
            created_at: self.created_at,
            schedule,
        })
    }
}
