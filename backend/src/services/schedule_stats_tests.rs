#[cfg(test)]
mod tests {
    use crate::api::{
        DailyCount, DateRange, FixedClock, NewQuery, QueryId, ScheduledQueryRecord,
    };
    use crate::db::repositories::LocalRepository;
    use crate::services::schedule_stats::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde_json::{json, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn record(id: i64, created_at: DateTime<Utc>, schedule: Value) -> ScheduledQueryRecord {
        ScheduledQueryRecord {
            id: QueryId(id),
            created_at,
            schedule,
        }
    }

    fn counts(series: &[DailyCount]) -> Vec<u64> {
        series.iter().map(|c| c.count).collect()
    }

    #[test]
    fn test_resolve_range_explicit() {
        let clock = FixedClock::at_date(date(2024, 7, 1));
        let range = resolve_range(Some("2024-06-01"), Some("2024-06-03"), &clock).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 6, 1), date(2024, 6, 3)));
    }

    #[test]
    fn test_resolve_range_defaults_when_either_missing() {
        let clock = FixedClock::at_date(date(2024, 7, 1));
        let expected = DateRange::new(date(2024, 6, 1), date(2024, 7, 1));

        assert_eq!(resolve_range(None, None, &clock).unwrap(), expected);
        assert_eq!(resolve_range(Some("2024-01-01"), None, &clock).unwrap(), expected);
        assert_eq!(resolve_range(None, Some("2024-01-01"), &clock).unwrap(), expected);
        assert_eq!(resolve_range(Some(""), Some("2024-01-01"), &clock).unwrap(), expected);
    }

    #[test]
    fn test_resolve_range_rejects_malformed_dates() {
        let clock = FixedClock::at_date(date(2024, 7, 1));
        assert_eq!(
            resolve_range(Some("2024-13-40"), Some("2024-06-03"), &clock),
            Err(InvalidDateFormat)
        );
        assert_eq!(
            resolve_range(Some("2024-06-01"), Some("not-a-date"), &clock),
            Err(InvalidDateFormat)
        );
        assert_eq!(
            InvalidDateFormat.to_string(),
            "Invalid date format. Use YYYY-MM-DD"
        );
    }

    #[test]
    fn test_resolve_range_rejects_loose_date_shapes() {
        let clock = FixedClock::at_date(date(2024, 7, 1));
        let cases = [
            (Some("24-06-01"), Some("2024-06-03")),
            (Some("2024-06-01"), Some("99-1-1")),
            (Some("+2024-06-01"), Some("2024-06-03")),
            (Some(" 2024-06-01"), Some("2024-06-03")),
            (Some("2024-06-01"), Some("2024-06-03 ")),
        ];
        for (start, end) in cases {
            assert_eq!(
                resolve_range(start, end, &clock),
                Err(InvalidDateFormat),
                "{:?} .. {:?}",
                start,
                end
            );
        }

        let range = resolve_range(Some("2024-6-1"), Some("2024-6-3"), &clock).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 6, 1), date(2024, 6, 3)));
    }

    #[test]
    fn test_resolve_range_keeps_inverted_bounds() {
        let clock = FixedClock::at_date(date(2024, 7, 1));
        let range = resolve_range(Some("2024-06-05"), Some("2024-06-01"), &clock).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_count_until_boundary_is_exclusive() {
        let records = vec![record(1, at(2024, 5, 1, 0), json!({"until": "2024-06-02"}))];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 3));

        let series = count_active_by_day(&records, range);
        assert_eq!(
            series.iter().map(|c| c.date).collect::<Vec<_>>(),
            vec![date(2024, 6, 1), date(2024, 6, 2), date(2024, 6, 3)]
        );
        assert_eq!(counts(&series), vec![1, 0, 0]);
    }

    #[test]
    fn test_count_respects_creation_day() {
        // Created mid-morning on the 2nd: not yet counted that day.
        let records = vec![record(1, at(2024, 6, 2, 10), json!({"interval": 60}))];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 4));

        assert_eq!(counts(&count_active_by_day(&records, range)), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_count_created_at_midnight_counts_same_day() {
        let records = vec![record(1, at(2024, 6, 2, 0), json!({"interval": 60}))];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 2));

        assert_eq!(counts(&count_active_by_day(&records, range)), vec![0, 1]);
    }

    #[test]
    fn test_count_unparsable_until_fails_open() {
        let records = vec![
            record(1, at(2024, 1, 1, 0), json!({"until": "garbage"})),
            record(2, at(2024, 1, 1, 0), json!({"until": 20240601})),
            record(3, at(2024, 1, 1, 0), json!({"until": null})),
            record(4, at(2024, 1, 1, 0), json!({"until": ""})),
            record(5, at(2024, 1, 1, 0), json!({"until": "24-06-02"})),
            record(6, at(2024, 1, 1, 0), json!({"until": "+2024-06-02"})),
            record(7, at(2024, 1, 1, 0), json!({"until": " 2024-06-02"})),
        ];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 3));

        assert_eq!(counts(&count_active_by_day(&records, range)), vec![7, 7, 7]);
    }

    #[test]
    fn test_count_skips_falsy_schedules() {
        let records = vec![
            record(1, at(2024, 1, 1, 0), json!({})),
            record(2, at(2024, 1, 1, 0), json!(false)),
            record(3, at(2024, 1, 1, 0), json!({"interval": 60})),
        ];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 1));

        assert_eq!(counts(&count_active_by_day(&records, range)), vec![1]);
    }

    #[test]
    fn test_count_empty_range() {
        let records = vec![record(1, at(2024, 1, 1, 0), json!({"interval": 60}))];
        let range = DateRange::new(date(2024, 6, 3), date(2024, 6, 1));
        assert!(count_active_by_day(&records, range).is_empty());
    }

    #[test]
    fn test_summarize() {
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 3));
        let series = vec![
            DailyCount { date: date(2024, 6, 1), count: 1 },
            DailyCount { date: date(2024, 6, 2), count: 2 },
            DailyCount { date: date(2024, 6, 3), count: 2 },
        ];

        let summary = summarize(range, &series);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.average, 1.7);
        assert_eq!(summary.max, 2);
    }

    #[test]
    fn test_summarize_empty() {
        let range = DateRange::new(date(2024, 6, 3), date(2024, 6, 1));
        let summary = summarize(range, &[]);
        assert_eq!(summary.days, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.max, 0);
    }

    #[tokio::test]
    async fn test_get_schedule_stats_excludes_archived() {
        let repo = LocalRepository::with_queries(vec![
            NewQuery::new("live", at(2024, 5, 1, 0)).with_schedule(json!({"interval": 60})),
            NewQuery::new("retired", at(2024, 5, 1, 0))
                .with_schedule(json!({"interval": 60}))
                .archived(),
            NewQuery::new("manual", at(2024, 5, 1, 0)),
        ]);
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 2));

        let series = get_schedule_stats(&repo, range).await.unwrap();
        assert_eq!(counts(&series), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_get_schedule_stats_empty_range_skips_fetch() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let range = DateRange::new(date(2024, 6, 2), date(2024, 6, 1));

        assert!(get_schedule_stats(&repo, range).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_schedule_stats_propagates_repository_errors() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 2));

        let err = get_schedule_stats(&repo, range).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_schedule_stats_summary() {
        let repo = LocalRepository::with_queries(vec![
            NewQuery::new("a", at(2024, 5, 1, 0)).with_schedule(json!({"until": "2024-06-02"})),
            NewQuery::new("b", at(2024, 5, 1, 0)).with_schedule(json!({"interval": 60})),
        ]);
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 3));

        let summary = get_schedule_stats_summary(&repo, range).await.unwrap();
        assert_eq!(summary.start_date, date(2024, 6, 1));
        assert_eq!(summary.end_date, date(2024, 6, 3));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average, 1.3);
        assert_eq!(summary.max, 2);
    }
}
