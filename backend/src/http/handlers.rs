//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use super::dto::{DailyCount, HealthResponse, ScheduleStatsQuery, ScheduleStatsSummary};
use super::error::AppError;
use super::state::AppState;
use crate::api::DateRange;
use crate::db::services as db_services;
use crate::services::schedule_stats;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Schedule statistics
// =============================================================================

fn resolve_range(state: &AppState, params: &ScheduleStatsQuery) -> Result<DateRange, AppError> {
    let range = schedule_stats::resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        state.clock.as_ref(),
    )?;
    debug!("Schedule stats range {} .. {}", range.start, range.end);
    Ok(range)
}

/// GET /api/schedule-stats
///
/// Daily count of non-archived queries with an active schedule.
pub async fn get_schedule_stats(
    State(state): State<AppState>,
    Query(params): Query<ScheduleStatsQuery>,
) -> HandlerResult<Vec<DailyCount>> {
    let range = resolve_range(&state, &params)?;
    let series = schedule_stats::get_schedule_stats(state.repository.as_ref(), range).await?;
    Ok(Json(series))
}

/// GET /api/schedule-stats/summary
pub async fn get_schedule_stats_summary(
    State(state): State<AppState>,
    Query(params): Query<ScheduleStatsQuery>,
) -> HandlerResult<ScheduleStatsSummary> {
    let range = resolve_range(&state, &params)?;
    let summary =
        schedule_stats::get_schedule_stats_summary(state.repository.as_ref(), range).await?;
    Ok(Json(summary))
}
