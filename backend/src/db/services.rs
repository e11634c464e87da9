//! Repository-agnostic service functions.
//!
//! These work against any [`FullRepository`] implementation so callers do not
//! need to know which backend is configured.

use log::{debug, warn};

use super::repository::{FullRepository, RepositoryResult};
use crate::api::{NewQuery, Query, QueryId};

/// Check that the repository backend is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    let healthy = repo.health_check().await?;
    if !healthy {
        warn!("Repository health check reported unhealthy backend");
    }
    Ok(healthy)
}

/// Store a new query and return its id.
pub async fn store_query<R: FullRepository + ?Sized>(
    repo: &R,
    query: &NewQuery,
) -> RepositoryResult<QueryId> {
    let id = repo.store_query(query).await?;
    debug!("Stored query {} ({})", id, query.name);
    Ok(id)
}

/// Fetch a single query by id.
pub async fn get_query<R: FullRepository + ?Sized>(
    repo: &R,
    id: QueryId,
) -> RepositoryResult<Query> {
    repo.get_query(id).await
}

/// Archive a query. Archived queries never contribute to schedule statistics.
pub async fn archive_query<R: FullRepository + ?Sized>(
    repo: &R,
    id: QueryId,
) -> RepositoryResult<()> {
    repo.set_archived(id, true).await?;
    debug!("Archived query {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(health_check(&repo).await.unwrap());

        repo.set_healthy(false);
        assert!(!health_check(&repo).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_and_archive() {
        let repo = LocalRepository::new();
        let id = store_query(&repo, &NewQuery::new("report", Utc::now()))
            .await
            .unwrap();

        assert!(!get_query(&repo, id).await.unwrap().is_archived);
        archive_query(&repo, id).await.unwrap();
        assert!(get_query(&repo, id).await.unwrap().is_archived);
    }

    #[tokio::test]
    async fn test_archive_missing_query() {
        let repo = LocalRepository::new();
        let err = archive_query(&repo, QueryId(42)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
