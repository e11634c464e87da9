//! Public API surface for the schedule statistics backend.
//!
//! This file consolidates the identifier, record and DTO types shared by the
//! repositories, the services and the HTTP layer.

pub use crate::models::{
    format_date, parse_date, start_of_day, Clock, DateRange, FixedClock, NewQuery, Query,
    QueryId, Schedule, ScheduledQuery, ScheduledQueryRecord, SystemClock, Until,
};
pub use crate::routes::schedule_stats::DailyCount;
pub use crate::routes::schedule_stats::ScheduleStatsSummary;
