//! Errors raised by the saved-query repositories.
//!
//! Every repository call returns [`RepositoryResult`]. Errors carry an
//! [`ErrorContext`] naming the repository operation (`fetch_scheduled_queries`,
//! `get_query`, ...) and, where one is involved, the saved query id.
//!
//! ```
//! use schedule_stats::api::QueryId;
//! use schedule_stats::db::repository::RepositoryError;
//!
//! let err = RepositoryError::query_not_found("set_archived", QueryId(7));
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "Saved query 7 not found [operation=set_archived, query=7]");
//! ```

use std::fmt;

use crate::api::QueryId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository operation, e.g. `fetch_scheduled_queries`
    pub operation: Option<String>,
    /// Saved query involved, if any
    pub query_id: Option<QueryId>,
    /// Backend-specific detail (pool state, database error kind)
    pub details: Option<String>,
    /// Whether retrying the same call may succeed
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Context for an operation on one saved query.
    pub fn for_query(operation: impl Into<String>, id: QueryId) -> Self {
        Self {
            query_id: Some(id),
            ..Self::new(operation)
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(op) = &self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(id) = self.query_id {
            parts.push(format!("query={}", id));
        }
        if let Some(details) = &self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store cannot be reached (pool exhausted, connection
    /// refused, in-memory store switched off). Always retryable.
    #[error("Storage unavailable: {message} {context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },

    /// A statement reached the store and failed.
    #[error("Query failed: {message} {context}")]
    QueryFailed {
        message: String,
        context: ErrorContext,
    },

    /// No saved query has the requested id.
    #[error("Saved query {id} not found {context}")]
    QueryNotFound { id: QueryId, context: ErrorContext },

    /// Stored or seeded data could not be decoded.
    #[error("Invalid data: {message} {context}")]
    InvalidData {
        message: String,
        context: ErrorContext,
    },

    /// Repository selection or connection settings are wrong.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Anything else (task join failures, migrations).
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Store unreachable during `operation`.
    pub fn unavailable(operation: &str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            context: ErrorContext::new(operation).retryable(),
        }
    }

    pub fn query_failed(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::QueryFailed {
            message: message.into(),
            context,
        }
    }

    pub fn query_not_found(operation: &str, id: QueryId) -> Self {
        Self::QueryNotFound {
            id,
            context: ErrorContext::for_query(operation, id),
        }
    }

    pub fn invalid_data(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidData {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(operation: &str, message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::new(operation),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.context().is_some_and(|c| c.retryable)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::QueryNotFound { .. })
    }

    /// Context of the failure; configuration errors have none.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Unavailable { context, .. }
            | Self::QueryFailed { context, .. }
            | Self::QueryNotFound { context, .. }
            | Self::InvalidData { context, .. }
            | Self::Internal { context, .. } => Some(context),
            Self::Configuration { .. } => None,
        }
    }

    /// Name the repository operation the error escaped from.
    pub fn with_operation(mut self, operation: &str) -> Self {
        match &mut self {
            Self::Unavailable { context, .. }
            | Self::QueryFailed { context, .. }
            | Self::QueryNotFound { context, .. }
            | Self::InvalidData { context, .. }
            | Self::Internal { context, .. } => {
                context.operation = Some(operation.to_string());
            }
            Self::Configuration { .. } => {}
        }
        self
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(kind, info) => {
                let context = ErrorContext::default().with_details(format!("{:?}", kind));
                // Serialization failures succeed on retry.
                let context = match kind {
                    DatabaseErrorKind::SerializationFailure => context.retryable(),
                    _ => context,
                };
                RepositoryError::query_failed(info.message(), context)
            }
            Error::DeserializationError(e) => RepositoryError::invalid_data(
                e.to_string(),
                ErrorContext::default().with_details("row decode"),
            ),
            other => RepositoryError::query_failed(other.to_string(), ErrorContext::default()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::unavailable("get_connection", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::for_query("get_query", QueryId(42))
            .with_details("pool=3/10")
            .retryable();
        assert_eq!(
            ctx.to_string(),
            "[operation=get_query, query=42, details=pool=3/10, retryable]"
        );
        assert_eq!(ErrorContext::default().to_string(), "[]");
    }

    #[test]
    fn test_configuration_has_no_context() {
        let err = RepositoryError::configuration("missing database_url").with_operation("create");
        assert!(err.context().is_none());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Configuration error: missing database_url");
    }
}
