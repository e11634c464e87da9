//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::api::{NewQuery, Query, QueryId, ScheduledQueryRecord};
use crate::db::repository::{
    QueryRepository, RepositoryError, RepositoryResult, ScheduleStatsRepository,
};

mod models;
mod schema;

use models::*;
use schema::queries;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

diesel::define_sql_function! {
    /// Postgres `jsonb_typeof`: the JSON type name of a document, `NULL` for SQL `NULL`.
    fn jsonb_typeof(
        value: diesel::sql_types::Nullable<diesel::sql_types::Jsonb>
    ) -> diesel::sql_types::Nullable<diesel::sql_types::Text>;
}

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read. Only the
    /// connection string is required.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| RepositoryError::unavailable("create_pool", e.to_string()))?;

        {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::unavailable("run_migrations", e.to_string()))?;
            Self::run_migrations(&mut conn)?;
        }
        info!(
            "Postgres pool ready (max_size={}, min_idle={})",
            config.max_pool_size, config.min_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal("run_migrations", format!("Migration failed: {}", e))
        })?;

        Ok(())
    }

    /// Execute a database operation on a blocking thread, retrying
    /// retryable errors up to `max_retries` times with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    if let Some(err) = &last_error {
                        warn!("Retrying after {:?} (attempt {}): {}", retry_delay, attempt + 1, err);
                    }
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::from(e);
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("with_conn", "Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| RepositoryError::internal("spawn_blocking", format!("Task join error: {}", e)))?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Returns `(is_healthy, latency_ms, error_message)`.
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        let result = self.health_check().await;
        let latency = Some(start.elapsed().as_millis() as u64);
        match result {
            Ok(true) => (true, latency, None),
            Ok(false) => (false, latency, Some("Health check returned false".to_string())),
            Err(e) => (false, latency, Some(e.to_string())),
        }
    }
}

#[async_trait]
impl QueryRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(|e| RepositoryError::from(e).with_operation("health_check"))
        })
        .await
    }

    async fn store_query(&self, query: &NewQuery) -> RepositoryResult<QueryId> {
        let row = NewQueryRow::from(query);
        self.with_conn(move |conn| {
            diesel::insert_into(queries::table)
                .values(&row)
                .returning(queries::id)
                .get_result::<i64>(conn)
                .map(QueryId)
                .map_err(|e| RepositoryError::from(e).with_operation("store_query"))
        })
        .await
    }

    async fn get_query(&self, id: QueryId) -> RepositoryResult<Query> {
        self.with_conn(move |conn| {
            queries::table
                .find(id.value())
                .select(QueryRow::as_select())
                .first::<QueryRow>(conn)
                .map(Query::from)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => {
                        RepositoryError::query_not_found("get_query", id)
                    }
                    other => RepositoryError::from(other).with_operation("get_query"),
                })
        })
        .await
    }

    async fn set_archived(&self, id: QueryId, archived: bool) -> RepositoryResult<()> {
        let updated = self
            .with_conn(move |conn| {
                diesel::update(queries::table.find(id.value()))
                    .set(queries::is_archived.eq(archived))
                    .execute(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("set_archived"))
            })
            .await?;

        if updated == 0 {
            return Err(RepositoryError::query_not_found("set_archived", id));
        }
        Ok(())
    }

    async fn count_queries(&self) -> RepositoryResult<usize> {
        self.with_conn(|conn| {
            queries::table
                .count()
                .get_result::<i64>(conn)
                .map(|n| n.max(0) as usize)
                .map_err(|e| RepositoryError::from(e).with_operation("count_queries"))
        })
        .await
    }
}

#[async_trait]
impl ScheduleStatsRepository for PostgresRepository {
    async fn fetch_scheduled_queries(
        &self,
        created_on_or_before: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledQueryRecord>> {
        self.with_conn(move |conn| {
            let rows = queries::table
                .filter(jsonb_typeof(queries::schedule).ne("null"))
                .filter(queries::created_at.le(created_on_or_before))
                .filter(queries::is_archived.eq(false))
                .order(queries::id.asc())
                .select(ScheduledQueryRow::as_select())
                .load::<ScheduledQueryRow>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("fetch_scheduled_queries"))?;

            Ok(rows
                .into_iter()
                .filter_map(ScheduledQueryRow::into_record)
                .collect())
        })
        .await
    }
}
