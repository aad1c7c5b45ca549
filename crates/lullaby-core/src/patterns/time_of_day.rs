//! Recommended wake time and bedtime from recent night sleeps.
//!
//! Both analyzers share one estimator: collect the local hour of the
//! relevant night-sleep timestamp (end for waking, start for bedtime),
//! blend the rounded-hour mode with the mean, and grade confidence by
//! sample count and spread.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::{mean, population_std_dev, rounded_mode};
use crate::confidence::Confidence;
use crate::error::ValidationError;
use crate::event::{age_in_days, SleepEvent};
use crate::guidelines::{bedtime_range_for_age, wake_time_range_for_age, HourRange};
use crate::time::{time_of_day, Clock};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 14;

/// Half-width of the typical range around the recommendation, in hours.
const RANGE_HALF_WIDTH: f64 = 1.5;

/// Local clock times bounding the usual spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A recommended clock time with supporting detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecommendation {
    /// Most recent past occurrence of the recommended local time
    pub recommended_time: DateTime<Utc>,
    pub confidence: Confidence,
    pub typical_range: TimeRange,
    pub reasoning: String,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    WakeTime,
    Bedtime,
}

impl Anchor {
    fn label(self) -> &'static str {
        match self {
            Anchor::WakeTime => "wake time",
            Anchor::Bedtime => "bedtime",
        }
    }

    fn instant(self, event: &SleepEvent) -> Option<DateTime<Utc>> {
        match self {
            Anchor::WakeTime => event.end_time,
            Anchor::Bedtime => Some(event.start_time),
        }
    }

    fn age_range(self, age_days: Option<i64>) -> HourRange {
        match self {
            Anchor::WakeTime => wake_time_range_for_age(age_days),
            Anchor::Bedtime => bedtime_range_for_age(age_days),
        }
    }
}

/// Recommend a morning wake time from completed night sleeps.
pub fn analyze_optimal_wake_time(
    events: &[SleepEvent],
    birth_date: Option<DateTime<Utc>>,
    clock: &Clock,
    lookback_days: i64,
) -> Result<TimeRecommendation, ValidationError> {
    analyze(Anchor::WakeTime, events, birth_date, clock, lookback_days)
}

/// Recommend a bedtime from night sleep onsets, including one in progress.
pub fn analyze_optimal_bedtime(
    events: &[SleepEvent],
    birth_date: Option<DateTime<Utc>>,
    clock: &Clock,
    lookback_days: i64,
) -> Result<TimeRecommendation, ValidationError> {
    analyze(Anchor::Bedtime, events, birth_date, clock, lookback_days)
}

fn analyze(
    anchor: Anchor,
    events: &[SleepEvent],
    birth_date: Option<DateTime<Utc>>,
    clock: &Clock,
    lookback_days: i64,
) -> Result<TimeRecommendation, ValidationError> {
    let age_days = age_in_days(birth_date, clock)?;
    let window_start = clock.lookback_start(lookback_days)?;
    let now = clock.now();

    let hours: Vec<f64> = events
        .iter()
        .filter(|e| e.is_night() && !e.skipped && !e.scheduled)
        .filter_map(|e| anchor.instant(e))
        .filter(|t| *t >= window_start && *t <= now)
        .map(|t| clock.hour_of_day(t))
        .collect();

    let (Some(mode), Some(avg), Some(spread)) =
        (rounded_mode(&hours), mean(&hours), population_std_dev(&hours))
    else {
        return age_default(anchor, age_days, clock, lookback_days);
    };

    let recommended_hour = 0.6 * mode + 0.4 * avg;
    let confidence = grade(hours.len(), spread);
    tracing::debug!(
        anchor = anchor.label(),
        samples = hours.len(),
        mode,
        mean = avg,
        spread,
        recommended_hour,
        "estimated night-sleep time of day"
    );

    Ok(TimeRecommendation {
        recommended_time: clock.most_recent_at(recommended_hour)?,
        confidence,
        typical_range: TimeRange {
            start: time_of_day((recommended_hour - RANGE_HALF_WIDTH).clamp(0.0, 23.0))?,
            end: time_of_day((recommended_hour + RANGE_HALF_WIDTH).clamp(0.0, 23.0))?,
        },
        reasoning: format!(
            "Based on {} night sleeps in the last {} days, the usual {} is around {} ({} confidence)",
            hours.len(),
            lookback_days,
            anchor.label(),
            time_of_day(recommended_hour)?.format("%H:%M"),
            confidence
        ),
        sample_count: hours.len(),
    })
}

fn grade(samples: usize, spread: f64) -> Confidence {
    if samples >= 10 && spread < 1.5 {
        Confidence::High
    } else if (samples >= 10 && spread < 2.5) || (5..10).contains(&samples) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn age_default(
    anchor: Anchor,
    age_days: Option<i64>,
    clock: &Clock,
    lookback_days: i64,
) -> Result<TimeRecommendation, ValidationError> {
    let range = anchor.age_range(age_days);
    let age = match age_days {
        Some(days) => format!("a {}-week-old", days / 7),
        None => "unknown age".to_string(),
    };
    tracing::debug!(anchor = anchor.label(), ?age_days, "no night sleeps, using age default");

    Ok(TimeRecommendation {
        recommended_time: clock.most_recent_at(range.typical)?,
        confidence: Confidence::Low,
        typical_range: TimeRange {
            start: time_of_day(range.early)?,
            end: time_of_day(range.late)?,
        },
        reasoning: format!(
            "No night sleeps recorded in the last {} days; using the typical {} for {} ({} confidence)",
            lookback_days,
            anchor.label(),
            age,
            Confidence::Low
        ),
        sample_count: 0,
    })
}
