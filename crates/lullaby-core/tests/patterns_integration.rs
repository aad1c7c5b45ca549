//! Integration tests for pattern analysis over a realistic week of history.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use lullaby_core::patterns::{
    analyze_night_sleep_quality, analyze_optimal_bedtime, analyze_optimal_wake_time,
    calculate_wake_windows, lookback,
};
use lullaby_core::{Clock, Confidence, EngineConfig, SleepCategory, SleepEngine, SleepEvent};

fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, d, h, m, 0).unwrap()
}

/// Seven nights 19:00-06:00 UTC with two one-hour naps each day.
fn week() -> Vec<SleepEvent> {
    let mut events = Vec::new();
    for d in 1..=7 {
        events.push(
            SleepEvent::completed(format!("night-{d}"), utc(d, 19, 0), utc(d + 1, 6, 0))
                .with_category(SleepCategory::Night),
        );
        events.push(
            SleepEvent::completed(format!("nap-a-{d}"), utc(d + 1, 9, 0), utc(d + 1, 10, 0))
                .with_category(SleepCategory::Nap),
        );
        events.push(
            SleepEvent::completed(format!("nap-b-{d}"), utc(d + 1, 13, 0), utc(d + 1, 14, 0))
                .with_category(SleepCategory::Nap),
        );
    }
    events
}

fn clock() -> Clock {
    Clock::fixed(utc(8, 16, 0))
}

#[test]
fn test_regular_week_recommendations() {
    let events = week();
    let birth = Some(clock().now() - Duration::days(200));

    let wake = analyze_optimal_wake_time(&events, birth, &clock(), lookback::TIME_OF_DAY).unwrap();
    assert_eq!(wake.sample_count, 7);
    assert_eq!(wake.confidence, Confidence::Medium);
    assert_eq!(wake.recommended_time, utc(8, 6, 0));

    let bedtime = analyze_optimal_bedtime(&events, birth, &clock(), lookback::TIME_OF_DAY).unwrap();
    assert_eq!(bedtime.sample_count, 7);
    // Tonight's 19:00 is still ahead, so the most recent one is yesterday's.
    assert_eq!(bedtime.recommended_time, utc(7, 19, 0));

    let quality = analyze_night_sleep_quality(&events, &clock(), lookback::QUALITY).unwrap();
    assert_eq!(quality.consistency_score, 100);
    assert_eq!(quality.average_duration_minutes, Some(660.0));
}

#[test]
fn test_wake_window_from_week() {
    let events = week();
    let result = calculate_wake_windows(&events, None, &clock(), lookback::WAKE_WINDOW).unwrap();

    // Gaps of 180 minutes (06:00-09:00, 10:00-13:00) and 300 minutes
    // (14:00-19:00), all under the overnight cutoff.
    assert!(result.sample_count >= 10);
    assert_eq!(result.confidence, Confidence::High);
    let pattern = result.pattern_based_minutes.unwrap();
    assert!((180..=300).contains(&pattern));
}

#[test]
fn test_local_offset_shifts_hours() {
    let events = week();
    // UTC+02:00: nights run 21:00-08:00 local.
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_clock = clock().with_offset(offset);

    let metrics = analyze_night_sleep_quality(&events, &local_clock, 14).unwrap();
    assert_eq!(metrics.average_bedtime, NaiveTime::from_hms_opt(21, 0, 0));
    assert_eq!(metrics.average_wake_time, NaiveTime::from_hms_opt(8, 0, 0));
}

#[test]
fn test_short_lookback_limits_samples() {
    let events = week();
    let mut config = EngineConfig::default();
    config.lookback.quality_days = 3;
    config.lookback.wake_time_days = 3;

    let insights = SleepEngine::new(config)
        .insights(&events, None, &clock())
        .unwrap();
    // Nights starting on or after 06-05 16:00.
    assert_eq!(insights.quality.sample_count, 3);
    // Wake-ups on or after 06-05 16:00: 06-06, 06-07, 06-08.
    assert_eq!(insights.wake_time.sample_count, 3);
    assert_eq!(insights.naps.naps.len(), 3);
}
