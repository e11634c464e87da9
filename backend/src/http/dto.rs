//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::api::{DailyCount, ScheduleStatsSummary};

/// Query parameters for the schedule statistics endpoints.
///
/// Values are kept as raw strings so malformed dates reach the service and
/// produce the dedicated error body instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleStatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Database connection status
    pub database: String,
}
