use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Schedule statistics types
// =========================================================

/// Number of queries with an active schedule on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub count: u64,
}

/// Aggregate figures over a daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatsSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    /// Sum of the daily counts.
    pub total: u64,
    /// Mean daily count, rounded to one decimal.
    pub average: f64,
    /// Largest daily count.
    pub max: u64,
}

/// Route function name constants for schedule statistics
pub const GET_SCHEDULE_STATS: &str = "get_schedule_stats";
pub const GET_SCHEDULE_STATS_SUMMARY: &str = "get_schedule_stats_summary";

/// HTTP paths
pub const SCHEDULE_STATS_PATH: &str = "/api/schedule-stats";
pub const SCHEDULE_STATS_SUMMARY_PATH: &str = "/api/schedule-stats/summary";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_daily_count_wire_format() {
        let entry = DailyCount {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            count: 3,
        };
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({"date": "2024-06-01", "count": 3})
        );
    }

    #[test]
    fn test_daily_count_deserialize() {
        let entry: DailyCount =
            serde_json::from_value(json!({"date": "2024-12-31", "count": 0})).unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(entry.count, 0);
    }

    #[test]
    fn test_const_values() {
        assert_eq!(GET_SCHEDULE_STATS, "get_schedule_stats");
        assert_eq!(GET_SCHEDULE_STATS_SUMMARY, "get_schedule_stats_summary");
        assert!(SCHEDULE_STATS_SUMMARY_PATH.starts_with(SCHEDULE_STATS_PATH));
    }
}
