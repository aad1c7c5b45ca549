//! Suggested duration for quick-logging a sleep.

use crate::event::SleepEvent;
use crate::guidelines::quick_log_duration_for_age;

/// Longest duration still treated as a realistic single sleep.
const MAX_REALISTIC_MINUTES: i64 = 480;

/// Blend recent observed durations with the age default.
///
/// Recent history weighs 60% with at least three usable samples and 40%
/// with one or two. Without samples the age default is returned as is.
pub fn suggest_duration(recent: &[&SleepEvent], age_days: Option<i64>) -> i64 {
    let age_default = quick_log_duration_for_age(age_days) as f64;

    let samples: Vec<f64> = recent
        .iter()
        .filter(|e| !e.is_in_progress())
        .filter_map(|e| e.duration_minutes)
        .filter(|d| *d > 0 && *d < MAX_REALISTIC_MINUTES)
        .map(|d| d as f64)
        .collect();

    if samples.is_empty() {
        return age_default.round() as i64;
    }

    let observed = samples.iter().sum::<f64>() / samples.len() as f64;
    let recent_weight = if samples.len() >= 3 { 0.6 } else { 0.4 };

    (observed * recent_weight + age_default * (1.0 - recent_weight)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn lasting(minutes: i64) -> SleepEvent {
        let start = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        SleepEvent::completed(format!("s{minutes}"), start, start + Duration::minutes(minutes))
    }

    #[test]
    fn test_no_samples_uses_age_default() {
        assert_eq!(suggest_duration(&[], None), 60);
        assert_eq!(suggest_duration(&[], Some(30)), 45);
        assert_eq!(suggest_duration(&[], Some(400)), 105);
    }

    #[test]
    fn test_few_samples_lean_on_age() {
        let a = lasting(100);
        // 0.4 * 100 + 0.6 * 45
        assert_eq!(suggest_duration(&[&a], Some(30)), 67);
    }

    #[test]
    fn test_many_samples_lean_on_history() {
        let (a, b, c) = (lasting(90), lasting(90), lasting(90));
        // 0.6 * 90 + 0.4 * 60
        assert_eq!(suggest_duration(&[&a, &b, &c], None), 78);
    }

    #[test]
    fn test_unrealistic_durations_ignored() {
        let (a, b) = (lasting(0), lasting(600));
        assert_eq!(suggest_duration(&[&a, &b], Some(120)), 75);
    }
}
