//! Daily counts of queries with an active refresh schedule.
//!
//! A query counts towards day `D` when it is not archived, was created no
//! later than the start of `D`, carries a schedule, and that schedule has not
//! expired by `D` (see [`Schedule::is_active_on`](crate::models::Schedule::is_active_on)).

use log::debug;
use thiserror::Error;

use crate::api::{
    parse_date, start_of_day, Clock, DailyCount, DateRange, ScheduleStatsSummary, ScheduledQuery,
    ScheduledQueryRecord,
};
use crate::db::repository::{RepositoryResult, ScheduleStatsRepository};

/// A `start_date` or `end_date` parameter that is not a `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date format. Use YYYY-MM-DD")]
pub struct InvalidDateFormat;

/// Resolve the requested reporting window.
///
/// Both bounds must be given for an explicit range; if either is missing or
/// empty the trailing window ending today is used instead.
pub fn resolve_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    clock: &dyn Clock,
) -> Result<DateRange, InvalidDateFormat> {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty())
    }

    match (non_empty(start_date), non_empty(end_date)) {
        (Some(start), Some(end)) => {
            let start = parse_date(start).map_err(|_| InvalidDateFormat)?;
            let end = parse_date(end).map_err(|_| InvalidDateFormat)?;
            Ok(DateRange::new(start, end))
        }
        _ => Ok(DateRange::trailing(clock.today())),
    }
}

/// Count, for every day in `range`, the records whose schedule is active.
///
/// Records that do not decode to a schedule are skipped.
pub fn count_active_by_day(records: &[ScheduledQueryRecord], range: DateRange) -> Vec<DailyCount> {
    let scheduled: Vec<ScheduledQuery> = records.iter().filter_map(|r| r.decode()).collect();

    range
        .days()
        .map(|day| {
            let cutoff = start_of_day(day);
            let count = scheduled
                .iter()
                .filter(|q| q.created_at <= cutoff && q.schedule.is_active_on(day))
                .count() as u64;
            DailyCount { date: day, count }
        })
        .collect()
}

/// Daily active-schedule counts for `range`, ascending by date.
///
/// Issues a single repository fetch covering the whole range.
pub async fn get_schedule_stats<R: ScheduleStatsRepository + ?Sized>(
    repo: &R,
    range: DateRange,
) -> RepositoryResult<Vec<DailyCount>> {
    if range.is_empty() {
        debug!("Empty range {} .. {}, skipping fetch", range.start, range.end);
        return Ok(Vec::new());
    }

    let records = repo.fetch_scheduled_queries(start_of_day(range.end)).await?;
    debug!(
        "Fetched {} scheduled queries for {} .. {}",
        records.len(),
        range.start,
        range.end
    );

    Ok(count_active_by_day(&records, range))
}

/// Total, average and peak of a daily series.
pub fn summarize(range: DateRange, counts: &[DailyCount]) -> ScheduleStatsSummary {
    let days = counts.len();
    let total: u64 = counts.iter().map(|c| c.count).sum();
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let average = if days == 0 {
        0.0
    } else {
        (total as f64 / days as f64 * 10.0).round() / 10.0
    };

    ScheduleStatsSummary {
        start_date: range.start,
        end_date: range.end,
        days,
        total,
        average,
        max,
    }
}

/// Summary figures for `range`.
pub async fn get_schedule_stats_summary<R: ScheduleStatsRepository + ?Sized>(
    repo: &R,
    range: DateRange,
) -> RepositoryResult<ScheduleStatsSummary> {
    let counts = get_schedule_stats(repo, range).await?;
    Ok(summarize(range, &counts))
}

#[cfg(test)]
#[path = "schedule_stats_tests.rs"]
mod schedule_stats_tests;
