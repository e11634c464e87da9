//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (permission gate, CORS,
//! compression, tracing), and creates the axum router ready for serving.

use axum::{middleware, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth;
use super::handlers;
use super::state::AppState;
use crate::routes::schedule_stats::{SCHEDULE_STATS_PATH, SCHEDULE_STATS_SUMMARY_PATH};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(SCHEDULE_STATS_PATH, get(handlers::get_schedule_stats))
        .route(
            SCHEDULE_STATS_SUMMARY_PATH,
            get(handlers::get_schedule_stats_summary),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_list_queries,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
