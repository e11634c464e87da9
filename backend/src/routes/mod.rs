pub mod schedule_stats;
