//! # Schedule Stats Backend
//!
//! Reports how many saved queries had an active refresh schedule on each day
//! of a date range.
//!
//! A query is counted on a day when it is not archived, existed by the start
//! of that day, carries a schedule, and the schedule's optional `until` date
//! lies after that day. The result is exposed as a REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Shared identifier, record and DTO types
//! - [`models`]: Domain types for queries, schedules and calendar ranges
//! - [`db`]: Repository traits, the Postgres and in-memory backends, and configuration
//! - [`services`]: Date range resolution, daily counting and summaries
//! - [`http`]: Axum-based HTTP server, permission gate and request handlers
//! - [`routes`]: Route-specific data types and path constants
//! - [`config`]: Server configuration

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
