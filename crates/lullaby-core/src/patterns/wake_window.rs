//! Wake-window length from age defaults and measured awake gaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::mean;
use crate::confidence::Confidence;
use crate::error::ValidationError;
use crate::event::{age_in_days, SleepEvent};
use crate::guidelines::interval_hours_for_age;
use crate::time::{minutes_between, Clock};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Wake window used when the birth date is unknown.
const UNKNOWN_AGE_WINDOW_MINUTES: i64 = 90;

/// Longest gap between sleeps still counted as one wake window.
const MAX_GAP_MINUTES: f64 = 720.0;

/// Recommended time awake between sleeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeWindowResult {
    pub window_minutes: i64,
    pub confidence: Confidence,
    pub age_based_minutes: i64,
    pub pattern_based_minutes: Option<i64>,
    pub reasoning: String,
    /// Number of measured gaps behind the pattern value
    pub sample_count: usize,
}

/// Blend the age-based wake window with gaps measured in recent history.
///
/// The pattern weight grows with the number of usable gaps: 0.7 from ten,
/// 0.5 from five, otherwise 0.3.
pub fn calculate_wake_windows(
    events: &[SleepEvent],
    birth_date: Option<DateTime<Utc>>,
    clock: &Clock,
    lookback_days: i64,
) -> Result<WakeWindowResult, ValidationError> {
    let age_days = age_in_days(birth_date, clock)?;
    let age_based = match age_days {
        Some(_) => ((interval_hours_for_age(age_days) - 0.5) * 60.0).round() as i64,
        None => UNKNOWN_AGE_WINDOW_MINUTES,
    };

    let window_start = clock.lookback_start(lookback_days)?;
    let now = clock.now();
    let mut completed: Vec<&SleepEvent> = events
        .iter()
        .filter(|e| !e.is_in_progress() && !e.skipped && !e.scheduled)
        .filter(|e| e.start_time >= window_start && e.start_time <= now)
        .collect();
    completed.sort_by_key(|e| e.start_time);

    let gaps: Vec<f64> = completed
        .windows(2)
        .filter_map(|pair| {
            let woke = pair[0].end_time?;
            Some(minutes_between(pair[1].start_time, woke))
        })
        .filter(|gap| *gap > 0.0 && *gap < MAX_GAP_MINUTES)
        .collect();

    let Some(pattern) = mean(&gaps) else {
        tracing::debug!(?age_days, age_based, "not enough sleeps for a measured wake window");
        return Ok(WakeWindowResult {
            window_minutes: age_based,
            confidence: Confidence::Low,
            age_based_minutes: age_based,
            pattern_based_minutes: None,
            reasoning: format!(
                "Not enough sleeps in the last {lookback_days} days; using the {age_based} minute age-based wake window ({} confidence)",
                Confidence::Low
            ),
            sample_count: 0,
        });
    };

    // Fewer than five gaps is common early on, when only a couple of
    // sleeps fall in the window.
    let (pattern_weight, confidence) = match gaps.len() {
        n if n >= 10 => (0.7, Confidence::High),
        n if n >= 5 => (0.5, Confidence::Medium),
        _ => (0.3, Confidence::Low),
    };

    let window = (age_based as f64 * (1.0 - pattern_weight) + pattern * pattern_weight).round() as i64;
    tracing::debug!(gaps = gaps.len(), pattern, age_based, window, "blended wake window");

    Ok(WakeWindowResult {
        window_minutes: window,
        confidence,
        age_based_minutes: age_based,
        pattern_based_minutes: Some(pattern.round() as i64),
        reasoning: format!(
            "Blended {age_based} minute age-based window with {} measured wake windows averaging {} minutes ({} confidence)",
            gaps.len(),
            pattern.round() as i64,
            confidence
        ),
        sample_count: gaps.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 6, 0, 0).unwrap()
    }

    /// `count` 60 minute sleeps separated by `awake` minutes.
    fn cycle(count: i64, awake: i64) -> Vec<SleepEvent> {
        (0..count)
            .map(|i| {
                let start = base() + Duration::minutes(i * (60 + awake));
                SleepEvent::completed(format!("s{i}"), start, start + Duration::minutes(60))
            })
            .collect()
    }

    #[test]
    fn test_unknown_age_default() {
        let clock = Clock::fixed(base());
        let result = calculate_wake_windows(&[], None, &clock, 7).unwrap();
        assert_eq!(result.window_minutes, 90);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.pattern_based_minutes, None);
    }

    #[test]
    fn test_age_based_from_interval() {
        let clock = Clock::fixed(base());
        // 18 days -> 3.0h interval -> 150 minutes
        let birth = Some(clock.now() - Duration::days(18));
        let result = calculate_wake_windows(&[], birth, &clock, 7).unwrap();
        assert_eq!(result.age_based_minutes, 150);
    }

    #[test]
    fn test_few_gaps_low_weight() {
        let events = cycle(3, 120);
        let clock = Clock::fixed(base() + Duration::hours(12));
        let result = calculate_wake_windows(&events, None, &clock, 7).unwrap();

        // 0.7 * 90 + 0.3 * 120 = 99
        assert_eq!(result.sample_count, 2);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.window_minutes, 99);
        assert_eq!(result.pattern_based_minutes, Some(120));
    }

    #[test]
    fn test_medium_and_high_tiers() {
        let clock = Clock::fixed(base() + Duration::days(2));

        let medium = calculate_wake_windows(&cycle(6, 100), None, &clock, 7).unwrap();
        assert_eq!(medium.confidence, Confidence::Medium);
        assert_eq!(medium.window_minutes, 95);

        let high = calculate_wake_windows(&cycle(11, 100), None, &clock, 7).unwrap();
        assert_eq!(high.confidence, Confidence::High);
        assert_eq!(high.window_minutes, 97);
    }

    #[test]
    fn test_sleeps_after_now_excluded() {
        let events = cycle(4, 120);
        // Only the first two sleeps (06:00 and 09:00) have started by 10:00.
        let clock = Clock::fixed(base() + Duration::hours(4));
        let result = calculate_wake_windows(&events, None, &clock, 7).unwrap();

        assert_eq!(result.sample_count, 1);
        assert_eq!(result.pattern_based_minutes, Some(120));
    }

    #[test]
    fn test_overnight_gaps_excluded() {
        let mut events = cycle(2, 90);
        let late = base() + Duration::hours(20);
        events.push(SleepEvent::completed("late", late, late + Duration::minutes(30)));
        let clock = Clock::fixed(base() + Duration::days(1));
        let result = calculate_wake_windows(&events, None, &clock, 7).unwrap();

        // The gap from 09:30 to 02:00 next day is 990 minutes and is dropped.
        assert_eq!(result.sample_count, 1);
        assert_eq!(result.pattern_based_minutes, Some(90));
    }
}
