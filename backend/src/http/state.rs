//! Application state for the HTTP server.

use std::sync::Arc;

use crate::api::{Clock, SystemClock};
use crate::config::AuthSettings;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Source of "today" for default date ranges
    pub clock: Arc<dyn Clock>,
    /// API key settings consulted by the permission gate
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    /// Create a new application state with the given repository, the wall
    /// clock and authentication disabled.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            auth: Arc::new(AuthSettings::disabled()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_auth(mut self, auth: AuthSettings) -> Self {
        self.auth = Arc::new(auth);
        self
    }
}
