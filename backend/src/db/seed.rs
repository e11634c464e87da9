//! Loading saved queries from a JSON seed file.
//!
//! The file holds a JSON array of [`NewQuery`] objects:
//!
//! ```json
//! [
//!   {"name": "daily signups", "created_at": "2024-05-01T09:00:00Z",
//!    "schedule": {"interval": 86400, "until": "2024-12-31"}},
//!   {"name": "retired report", "created_at": "2023-01-01T00:00:00Z",
//!    "is_archived": true, "schedule": {"interval": 3600}}
//! ]
//! ```

use log::info;
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, QueryRepository, RepositoryError, RepositoryResult};
use crate::api::NewQuery;

/// Read and parse a seed file.
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Vec<NewQuery>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        RepositoryError::configuration(format!(
            "Failed to read seed file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        RepositoryError::invalid_data(
            format!("Invalid seed file: {}", e),
            ErrorContext::new("load_seed_file").with_details(path.display().to_string()),
        )
    })
}

/// Store every query in `queries`, in order. Returns how many were stored.
pub async fn seed_repository<R: QueryRepository + ?Sized>(
    repo: &R,
    queries: &[NewQuery],
) -> RepositoryResult<usize> {
    for query in queries {
        repo.store_query(query).await?;
    }
    info!("Seeded repository with {} queries", queries.len());
    Ok(queries.len())
}
