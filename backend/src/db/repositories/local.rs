//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. All data lives in a
//! `BTreeMap` keyed by query id behind an `RwLock`, which keeps iteration
//! order deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{NewQuery, Query, QueryId, ScheduledQueryRecord};
use crate::db::repository::*;
use crate::models::query::has_schedule_document;

/// In-memory local repository.
///
/// # Example
/// ```
/// use schedule_stats::api::NewQuery;
/// use schedule_stats::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// repo.insert(NewQuery::new("daily signups", chrono::Utc::now()));
/// assert_eq!(repo.query_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    queries: BTreeMap<QueryId, Query>,
    next_query_id: QueryId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            queries: BTreeMap::new(),
            next_query_id: QueryId(1),
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `queries`, in order.
    pub fn with_queries(queries: impl IntoIterator<Item = NewQuery>) -> Self {
        let repo = Self::new();
        for query in queries {
            repo.insert(query);
        }
        repo
    }

    // A poisoned lock only means another thread panicked mid-write; the
    // maps themselves are still consistent after every statement.
    fn read(&self) -> RwLockReadGuard<'_, LocalData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocalData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a query synchronously and return its id.
    pub fn insert(&self, query: NewQuery) -> QueryId {
        let mut data = self.write();
        let id = data.next_query_id;
        data.next_query_id = QueryId(id.0 + 1);
        data.queries.insert(
            id,
            Query {
                id,
                name: query.name,
                created_at: query.created_at,
                is_archived: query.is_archived,
                schedule: query.schedule,
            },
        );
        id
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation other than `health_check` fails with a
    /// retryable connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of queries stored.
    pub fn query_count(&self) -> usize {
        self.read().queries.len()
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::unavailable(
                operation,
                "local repository marked unhealthy",
            ))
        }
    }
}

#[async_trait]
impl QueryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.read().is_healthy)
    }

    async fn store_query(&self, query: &NewQuery) -> RepositoryResult<QueryId> {
        Self::ensure_healthy(&self.read(), "store_query")?;
        Ok(self.insert(query.clone()))
    }

    async fn get_query(&self, id: QueryId) -> RepositoryResult<Query> {
        let data = self.read();
        Self::ensure_healthy(&data, "get_query")?;
        data.queries
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::query_not_found("get_query", id))
    }

    async fn set_archived(&self, id: QueryId, archived: bool) -> RepositoryResult<()> {
        let mut data = self.write();
        Self::ensure_healthy(&data, "set_archived")?;
        match data.queries.get_mut(&id) {
            Some(query) => {
                query.is_archived = archived;
                Ok(())
            }
            None => Err(RepositoryError::query_not_found("set_archived", id)),
        }
    }

    async fn count_queries(&self) -> RepositoryResult<usize> {
        let data = self.read();
        Self::ensure_healthy(&data, "count_queries")?;
        Ok(data.queries.len())
    }
}

#[async_trait]
impl ScheduleStatsRepository for LocalRepository {
    async fn fetch_scheduled_queries(
        &self,
        created_on_or_before: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledQueryRecord>> {
        let data = self.read();
        Self::ensure_healthy(&data, "fetch_scheduled_queries")?;

        let rows = data
            .queries
            .values()
            .filter(|q| !q.is_archived)
            .filter(|q| q.created_at <= created_on_or_before)
            .filter(|q| has_schedule_document(q.schedule.as_ref()))
            .filter_map(|q| {
                q.schedule.as_ref().map(|schedule| ScheduledQueryRecord {
                    id: q.id,
                    created_at: q.created_at,
                    schedule: schedule.clone(),
                })
            })
            .collect();

        Ok(rows)
    }
}
