//! Property-based tests using proptest
//!
//! These check that config values always land in range and that the stats
//! store never loses or invents counts, whatever the input.

use breathebreak::config::{
    clamp_interval, validate_interval_input, Config, MAX_INTERVAL, MIN_INTERVAL,
};
use breathebreak::stats::{format_focus_time, DailyStats};
use breathebreak::{ManualClock, StatsStore, SUMMARY_DAYS};
use chrono::{Duration, Local};
use proptest::prelude::*;
use toml::Value;

#[derive(Debug, Clone)]
enum Op {
    Reminder,
    Break(u64),
    SessionStart,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Reminder),
        (0u64..600).prop_map(Op::Break),
        Just(Op::SessionStart),
    ]
}

fn arbitrary_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_map(Value::Float),
        any::<bool>().prop_map(Value::Boolean),
        ".{0,20}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn test_clamp_interval_always_in_range(value in arbitrary_value()) {
        let minutes = clamp_interval(Some(&value));
        prop_assert!((MIN_INTERVAL..=MAX_INTERVAL).contains(&minutes));
    }

    #[test]
    fn test_clamp_interval_identity_in_range(minutes in MIN_INTERVAL..=MAX_INTERVAL) {
        prop_assert_eq!(clamp_interval(Some(&Value::Integer(i64::from(minutes)))), minutes);
    }

    #[test]
    fn test_interval_input_never_panics(text in ".{0,12}") {
        if let Ok(minutes) = validate_interval_input(&text) {
            prop_assert!((MIN_INTERVAL..=MAX_INTERVAL).contains(&minutes));
        }
    }

    #[test]
    fn test_config_from_any_document_is_valid(
        interval in arbitrary_value(),
        duration in arbitrary_value(),
        title in ".{0,200}",
    ) {
        let mut document = toml::Table::new();
        document.insert("interval_minutes".into(), interval);
        document.insert("break_duration_seconds".into(), duration);
        document.insert("notification_title".into(), Value::String(title));

        let config = Config::from_document(&document);
        prop_assert!((MIN_INTERVAL..=MAX_INTERVAL).contains(&config.interval_minutes));
        prop_assert!((5..=300).contains(&config.break_duration_seconds));
        prop_assert!(config.notification_title.chars().count() <= 64);
    }

    #[test]
    fn test_counters_equal_number_of_calls(ops in prop::collection::vec(arbitrary_op(), 0..60)) {
        let clock = ManualClock::new(Local::now());
        let mut store = StatsStore::in_memory().with_clock(clock);

        let mut expected = DailyStats::new(store.today_stats().date);
        for op in &ops {
            match op {
                Op::Reminder => {
                    store.record_reminder();
                    expected.reminders_sent += 1;
                }
                Op::Break(seconds) => {
                    store.record_break(*seconds);
                    expected.breaks_acknowledged += 1;
                    expected.total_break_seconds += seconds;
                }
                Op::SessionStart => {
                    store.record_session_start();
                    expected.sessions_started += 1;
                }
            }
        }

        prop_assert_eq!(store.today_stats(), expected);
        prop_assert_eq!(store.is_empty(), ops.is_empty());
    }

    #[test]
    fn test_focus_session_credits_nominal_duration(seconds in 0i64..200_000) {
        let clock = ManualClock::new(Local::now());
        let mut store = StatsStore::in_memory().with_clock(clock.clone());

        store.start_focus_session();
        clock.advance(Duration::seconds(seconds));
        prop_assert_eq!(store.end_focus_session(), Some(seconds as u64));
        prop_assert_eq!(store.today_stats().focus_seconds, seconds as u64);
    }

    #[test]
    fn test_summary_never_panics(ops in prop::collection::vec(arbitrary_op(), 0..30), days in 0usize..10) {
        let mut store = StatsStore::in_memory();
        for op in &ops {
            match op {
                Op::Reminder => store.record_reminder(),
                Op::Break(seconds) => store.record_break(*seconds),
                Op::SessionStart => store.record_session_start(),
            }
        }
        let summary = store.summary(days);
        prop_assert!(!summary.is_empty());
        let _ = store.summary(SUMMARY_DAYS);
    }

    #[test]
    fn test_focus_format_round_trips_minutes(seconds in 0u64..10_000_000) {
        let text = format_focus_time(seconds);
        let (hours, minutes) = text
            .trim_end_matches('m')
            .split_once("h ")
            .expect("format is '{h}h {m}m'");
        let hours: u64 = hours.parse().unwrap();
        let minutes: u64 = minutes.parse().unwrap();
        prop_assert!(minutes < 60);
        prop_assert_eq!(hours * 60 + minutes, seconds / 60);
    }
}
