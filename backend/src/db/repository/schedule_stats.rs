//! Reads backing the schedule statistics endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::ScheduledQueryRecord;

/// Repository trait for schedule statistics.
#[async_trait]
pub trait ScheduleStatsRepository: Send + Sync {
    /// Fetch every candidate row for schedule activity reporting.
    ///
    /// A row is returned when the query is not archived, its schedule is
    /// present and is not the JSON literal `null`, and
    /// `created_at <= created_on_or_before`.
    ///
    /// Rows are ordered by id. Further filtering (falsy schedules, expiry)
    /// happens in the service layer.
    async fn fetch_scheduled_queries(
        &self,
        created_on_or_before: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledQueryRecord>>;
}
