//! Saved query repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewQuery, Query, QueryId};

/// Core storage operations for saved queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait QueryRepository: Send + Sync {
    /// Check that the backing store is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` if the store answers
    /// * `Ok(false)` if it is known to be unavailable
    /// * `Err(RepositoryError)` if the check itself fails
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a saved query.
    ///
    /// # Returns
    /// * `Ok(QueryId)` - Identifier assigned by the store
    /// * `Err(RepositoryError)` - If the insert fails
    async fn store_query(&self, query: &NewQuery) -> RepositoryResult<QueryId>;

    /// Fetch one saved query.
    ///
    /// # Returns
    /// * `Ok(Query)` if found
    /// * `Err(RepositoryError::QueryNotFound { .. })` if no row has this id
    async fn get_query(&self, id: QueryId) -> RepositoryResult<Query>;

    /// Set or clear the archived flag of a saved query.
    async fn set_archived(&self, id: QueryId, archived: bool) -> RepositoryResult<()>;

    /// Total number of saved queries, archived ones included.
    async fn count_queries(&self) -> RepositoryResult<usize>;
}
