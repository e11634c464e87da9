//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`query`]: Saved query storage (insert, lookup, archive flag, health)
//! - [`schedule_stats`]: Reads backing the schedule statistics endpoints
//!
//! # Convenience Trait Bound
//!
//! Code that needs every capability takes a [`FullRepository`]:
//!
//! ```ignore
//! async fn report<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let id = repo.store_query(new_query).await?;
//!     let rows = repo.fetch_scheduled_queries(cutoff).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod query;
pub mod schedule_stats;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use query::QueryRepository;
pub use schedule_stats::ScheduleStatsRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: QueryRepository + ScheduleStatsRepository {}

// Blanket implementation: anything implementing both traits is a FullRepository
impl<T> FullRepository for T where T: QueryRepository + ScheduleStatsRepository {}
