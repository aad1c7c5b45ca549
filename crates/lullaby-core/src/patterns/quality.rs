//! Night sleep consistency and trend.
//!
//! The consistency score rewards nights that start, end and last about the
//! same. Each of bedtime, wake time and duration variance is normalized
//! against a cap and turned into a 0-100 sub-score; the score is their mean.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::{mean, population_variance};
use crate::error::ValidationError;
use crate::event::SleepEvent;
use crate::time::{time_of_day, Clock};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 14;

/// Variance (hours squared) at which a time-of-day sub-score reaches zero.
const TIME_VARIANCE_CAP: f64 = 4.0;

/// Nights needed before a trend is reported.
const MIN_TREND_SAMPLES: usize = 6;

/// Relative change in mean duration that counts as a trend.
const TREND_THRESHOLD: f64 = 0.05;

/// Direction of night sleep duration over the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityMetrics {
    pub average_duration_minutes: Option<f64>,
    pub average_wake_time: Option<NaiveTime>,
    pub average_bedtime: Option<NaiveTime>,
    /// 0 (erratic) to 100 (identical nights)
    pub consistency_score: u8,
    pub quality_trend: QualityTrend,
    pub sample_count: usize,
}

impl SleepQualityMetrics {
    fn empty() -> Self {
        Self {
            average_duration_minutes: None,
            average_wake_time: None,
            average_bedtime: None,
            consistency_score: 0,
            quality_trend: QualityTrend::Stable,
            sample_count: 0,
        }
    }
}

/// Summarize completed night sleeps that started within the lookback window.
pub fn analyze_night_sleep_quality(
    events: &[SleepEvent],
    clock: &Clock,
    lookback_days: i64,
) -> Result<SleepQualityMetrics, ValidationError> {
    let window_start = clock.lookback_start(lookback_days)?;
    let now = clock.now();

    let mut nights: Vec<(&SleepEvent, DateTime<Utc>, f64)> = events
        .iter()
        .filter(|e| e.is_night() && !e.skipped && !e.scheduled)
        .filter(|e| e.start_time >= window_start && e.start_time <= now)
        .filter_map(|e| Some((e, e.end_time?, e.duration_minutes? as f64)))
        .collect();
    nights.sort_by_key(|(e, _, _)| e.start_time);

    let durations: Vec<f64> = nights.iter().map(|(_, _, d)| *d).collect();
    let Some(average_duration) = mean(&durations) else {
        return Ok(SleepQualityMetrics::empty());
    };

    let bedtimes: Vec<f64> = nights
        .iter()
        .map(|(e, _, _)| clock.hour_of_day(e.start_time))
        .collect();
    let wake_times: Vec<f64> = nights
        .iter()
        .map(|(_, end, _)| clock.hour_of_day(*end))
        .collect();

    let bedtime_score = sub_score(population_variance(&bedtimes), TIME_VARIANCE_CAP);
    let wake_score = sub_score(population_variance(&wake_times), TIME_VARIANCE_CAP);
    let duration_score = sub_score(population_variance(&durations), 0.5 * average_duration);
    let consistency = ((bedtime_score + wake_score + duration_score) / 3.0).round();

    let trend = trend(&durations);
    tracing::debug!(
        nights = durations.len(),
        bedtime_score,
        wake_score,
        duration_score,
        ?trend,
        "scored night sleep consistency"
    );

    Ok(SleepQualityMetrics {
        average_duration_minutes: Some(average_duration),
        average_wake_time: mean(&wake_times).map(time_of_day).transpose()?,
        average_bedtime: mean(&bedtimes).map(time_of_day).transpose()?,
        consistency_score: consistency.clamp(0.0, 100.0) as u8,
        quality_trend: trend,
        sample_count: durations.len(),
    })
}

/// `100 * (1 - min(1, variance / cap))`.
fn sub_score(variance: Option<f64>, cap: f64) -> f64 {
    let variance = variance.unwrap_or(0.0);
    if cap <= 0.0 {
        return if variance == 0.0 { 100.0 } else { 0.0 };
    }
    100.0 * (1.0 - (variance / cap).min(1.0))
}

/// Compare mean duration of the later half of the nights with the earlier half.
fn trend(durations: &[f64]) -> QualityTrend {
    if durations.len() < MIN_TREND_SAMPLES {
        return QualityTrend::Stable;
    }
    let (first, second) = durations.split_at(durations.len() / 2);
    let (Some(first), Some(second)) = (mean(first), mean(second)) else {
        return QualityTrend::Stable;
    };
    if first <= 0.0 {
        return QualityTrend::Stable;
    }

    let change = (second - first) / first;
    if change > TREND_THRESHOLD {
        QualityTrend::Improving
    } else if change < -TREND_THRESHOLD {
        QualityTrend::Declining
    } else {
        QualityTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SleepCategory;
    use chrono::{Duration, TimeZone};

    fn night(day: u32, bed_hour: u32, minutes: i64) -> SleepEvent {
        let start = Utc.with_ymd_and_hms(2025, 5, day, bed_hour, 0, 0).unwrap();
        SleepEvent::completed(format!("n{day}"), start, start + Duration::minutes(minutes))
            .with_category(SleepCategory::Night)
    }

    fn clock() -> Clock {
        Clock::fixed(Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_history() {
        let metrics = analyze_night_sleep_quality(&[], &clock(), 14).unwrap();
        assert_eq!(metrics, SleepQualityMetrics::empty());
    }

    #[test]
    fn test_identical_nights_score_full_marks() {
        let events: Vec<SleepEvent> = (1..=7).map(|d| night(d, 19, 660)).collect();
        let metrics = analyze_night_sleep_quality(&events, &clock(), 14).unwrap();

        assert_eq!(metrics.consistency_score, 100);
        assert_eq!(metrics.average_duration_minutes, Some(660.0));
        assert_eq!(metrics.average_bedtime, Some(NaiveTime::from_hms_opt(19, 0, 0).unwrap()));
        assert_eq!(metrics.average_wake_time, Some(NaiveTime::from_hms_opt(6, 0, 0).unwrap()));
        assert_eq!(metrics.quality_trend, QualityTrend::Stable);
    }

    #[test]
    fn test_variable_bedtimes_lower_the_score() {
        // Bedtimes 18:00 and 22:00 -> variance 4h^2 -> bedtime sub-score 0.
        // Wake times 05:00 and 09:00 -> wake sub-score 0. Durations equal -> 100.
        let events = vec![night(1, 18, 660), night(2, 22, 660)];
        let metrics = analyze_night_sleep_quality(&events, &clock(), 14).unwrap();
        assert_eq!(metrics.consistency_score, 33);
    }

    #[test]
    fn test_improving_trend() {
        let events: Vec<SleepEvent> = (1..=6)
            .map(|d| night(d, 19, if d <= 3 { 600 } else { 660 }))
            .collect();
        let metrics = analyze_night_sleep_quality(&events, &clock(), 14).unwrap();
        assert_eq!(metrics.quality_trend, QualityTrend::Improving);
    }

    #[test]
    fn test_declining_trend_needs_six_nights() {
        let five: Vec<SleepEvent> = (1..=5)
            .map(|d| night(d, 19, if d <= 2 { 660 } else { 540 }))
            .collect();
        let metrics = analyze_night_sleep_quality(&five, &clock(), 14).unwrap();
        assert_eq!(metrics.quality_trend, QualityTrend::Stable);

        let six: Vec<SleepEvent> = (1..=6)
            .map(|d| night(d, 19, if d <= 3 { 660 } else { 540 }))
            .collect();
        let metrics = analyze_night_sleep_quality(&six, &clock(), 14).unwrap();
        assert_eq!(metrics.quality_trend, QualityTrend::Declining);
    }

    #[test]
    fn test_in_progress_night_excluded() {
        let mut events = vec![night(1, 19, 660)];
        events.push(
            SleepEvent::in_progress("tonight", Utc.with_ymd_and_hms(2025, 5, 13, 19, 0, 0).unwrap())
                .with_category(SleepCategory::Night),
        );
        let metrics = analyze_night_sleep_quality(&events, &clock(), 14).unwrap();
        assert_eq!(metrics.sample_count, 1);
    }

    #[test]
    fn test_nights_after_now_excluded() {
        let mut events = vec![night(1, 19, 660)];
        events.push(night(20, 22, 540));
        let metrics = analyze_night_sleep_quality(&events, &clock(), 14).unwrap();

        assert_eq!(metrics.sample_count, 1);
        assert_eq!(metrics.average_duration_minutes, Some(660.0));
        assert_eq!(metrics.consistency_score, 100);
    }

    #[test]
    fn test_sub_score() {
        assert_eq!(sub_score(Some(0.0), 4.0), 100.0);
        assert_eq!(sub_score(Some(2.0), 4.0), 50.0);
        assert_eq!(sub_score(Some(10.0), 4.0), 0.0);
        assert_eq!(sub_score(Some(0.0), 0.0), 100.0);
    }
}
