//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits: they
//! resolve request inputs, issue repository calls and shape the results.

pub mod schedule_stats;

pub use schedule_stats::{
    count_active_by_day, get_schedule_stats, get_schedule_stats_summary, resolve_range,
    summarize, InvalidDateFormat,
};
