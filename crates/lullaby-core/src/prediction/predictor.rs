//! Next-sleep forecasting.
//!
//! The forecast blends the age-based interval with the child's own recent
//! sleep-to-sleep gaps. More history shifts weight toward the observed
//! pattern and raises the confidence tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::duration::suggest_duration;
use super::interval::{compute_intervals, valid_intervals, MAX_RECENT_SESSIONS};
use super::overdue::{minutes_until, OverdueThreshold};
use crate::confidence::Confidence;
use crate::error::ValidationError;
use crate::event::SleepEvent;
use crate::guidelines::interval_hours_for_age;
use crate::time::{offset_by_hours, Clock};

/// Entries shown in [`SleepPrediction::recent_pattern`].
const PATTERN_LENGTH: usize = 5;

/// Share of the predicted interval offered as a recovery nap once overdue.
const RECOVERY_FRACTION: f64 = 0.6;

/// One recent sleep as shown next to a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Start of the sleep
    pub time: DateTime<Utc>,
    /// Recorded duration in minutes
    pub duration: Option<i64>,
    /// Hours until the next newer sleep started
    pub interval_from_previous: Option<f64>,
}

/// Forecast of the next sleep onset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPrediction {
    pub next_sleep_time: DateTime<Utc>,
    pub confidence_level: Confidence,
    /// Blended interval used for the forecast
    pub interval_hours: f64,
    /// Mean of the plausible observed intervals
    pub average_interval_hours: Option<f64>,
    /// When the most recent completed sleep ended
    pub last_sleep_time: Option<DateTime<Utc>>,
    pub last_sleep_duration: Option<i64>,
    pub recent_pattern: Vec<PatternEntry>,
    pub is_overdue: bool,
    pub overdue_minutes: Option<i64>,
    pub suggested_recovery_time: Option<DateTime<Utc>>,
    /// Minutes to prefill when quick-logging a sleep
    pub suggested_duration: i64,
    pub recent_skip_time: Option<DateTime<Utc>>,
}

/// Weighted blend of age default, observed average and last observed gap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Blend {
    age: f64,
    average: f64,
    last: f64,
    confidence: Confidence,
}

impl Blend {
    fn for_sample_count(valid_count: usize) -> Self {
        match valid_count {
            0 => Blend {
                age: 1.0,
                average: 0.0,
                last: 0.0,
                confidence: Confidence::Low,
            },
            1 | 2 => Blend {
                age: 0.5,
                average: 0.3,
                last: 0.2,
                confidence: Confidence::Medium,
            },
            _ => Blend {
                age: 0.4,
                average: 0.4,
                last: 0.2,
                confidence: Confidence::High,
            },
        }
    }

    fn apply(&self, age_based: f64, average: Option<f64>, last: Option<f64>) -> f64 {
        self.age * age_based
            + self.average * average.unwrap_or(age_based)
            + self.last * last.unwrap_or(age_based)
    }
}

/// Predict when the child will next need to sleep.
///
/// In-progress and scheduled entries are ignored for the forecast itself;
/// only the ten most recent completed sleeps are considered. Sparse or empty
/// history degrades to the age-based interval with low confidence.
pub fn predict_next_sleep(
    events: &[SleepEvent],
    age_days: Option<i64>,
    clock: &Clock,
    policy: &dyn OverdueThreshold,
) -> Result<SleepPrediction, ValidationError> {
    let recent_skip_time = events
        .iter()
        .filter(|e| e.skipped)
        .map(|e| e.start_time)
        .max();

    let mut recent: Vec<&SleepEvent> = events
        .iter()
        .filter(|e| !e.scheduled && !e.is_in_progress())
        .collect();
    recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    recent.truncate(MAX_RECENT_SESSIONS);

    let age_based = interval_hours_for_age(age_days);

    let Some(last_sleep) = recent.first().copied() else {
        tracing::debug!(?age_days, age_based, "no completed sleeps, using age-based interval");
        return Ok(SleepPrediction {
            next_sleep_time: offset_by_hours(clock.now(), age_based, "next sleep time")?,
            confidence_level: Confidence::Low,
            interval_hours: age_based,
            average_interval_hours: None,
            last_sleep_time: None,
            last_sleep_duration: None,
            recent_pattern: Vec::new(),
            is_overdue: false,
            overdue_minutes: None,
            suggested_recovery_time: None,
            suggested_duration: suggest_duration(&[], age_days),
            recent_skip_time,
        });
    };

    let intervals = compute_intervals(&recent);
    let valid = valid_intervals(&intervals);

    let average = if valid.is_empty() {
        None
    } else {
        Some(valid.iter().sum::<f64>() / valid.len() as f64)
    };
    let last_interval = valid.first().copied();

    let blend = Blend::for_sample_count(valid.len());
    let predicted = blend.apply(age_based, average, last_interval);
    tracing::debug!(
        valid_intervals = valid.len(),
        age_based,
        ?average,
        ?last_interval,
        predicted,
        confidence = %blend.confidence,
        "blended next-sleep interval"
    );

    // A completed sleep always has an end time.
    let last_sleep_time = last_sleep.end_time.unwrap_or(last_sleep.start_time);
    let next_sleep_time = offset_by_hours(last_sleep_time, predicted, "next sleep time")?;

    let recent_pattern = recent
        .iter()
        .zip(intervals.iter())
        .take(PATTERN_LENGTH)
        .map(|(event, interval)| PatternEntry {
            time: event.start_time,
            duration: event.effective_duration_minutes(),
            interval_from_previous: *interval,
        })
        .collect();

    let threshold = policy.sleep_threshold_minutes(age_days);
    let until = minutes_until(next_sleep_time, clock);
    let is_overdue = until < -threshold;

    let (overdue_minutes, suggested_recovery_time) = if is_overdue {
        let recovery = offset_by_hours(
            clock.now(),
            RECOVERY_FRACTION * predicted,
            "suggested recovery time",
        )?;
        (Some(until.abs().round() as i64), Some(recovery))
    } else {
        (None, None)
    };

    Ok(SleepPrediction {
        next_sleep_time,
        confidence_level: blend.confidence,
        interval_hours: predicted,
        average_interval_hours: average,
        last_sleep_time: Some(last_sleep_time),
        last_sleep_duration: last_sleep.effective_duration_minutes(),
        recent_pattern,
        is_overdue,
        overdue_minutes,
        suggested_recovery_time,
        suggested_duration: suggest_duration(&recent, age_days),
        recent_skip_time,
    })
}
