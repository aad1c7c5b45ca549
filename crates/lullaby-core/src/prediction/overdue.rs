//! Overdue detection for predicted sleeps.
//!
//! How late a sleep may run before it counts as overdue is a policy owned by
//! the caller. It is injected through [`OverdueThreshold`]; the stock
//! [`AgeAwareThreshold`] gives younger babies less slack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{minutes_between, Clock};

/// Minutes a predicted sleep may pass before it is overdue.
pub trait OverdueThreshold {
    /// Threshold for the `sleep` activity type at the given age.
    fn sleep_threshold_minutes(&self, age_days: Option<i64>) -> f64;
}

impl<F> OverdueThreshold for F
where
    F: Fn(Option<i64>) -> f64,
{
    fn sleep_threshold_minutes(&self, age_days: Option<i64>) -> f64 {
        self(age_days)
    }
}

/// Threshold stepped by age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeAwareThreshold {
    /// Up to 90 days old
    pub newborn_minutes: f64,
    /// Up to one year old
    pub infant_minutes: f64,
    pub toddler_minutes: f64,
    pub unknown_age_minutes: f64,
}

impl Default for AgeAwareThreshold {
    fn default() -> Self {
        Self {
            newborn_minutes: 15.0,
            infant_minutes: 20.0,
            toddler_minutes: 30.0,
            unknown_age_minutes: 20.0,
        }
    }
}

impl OverdueThreshold for AgeAwareThreshold {
    fn sleep_threshold_minutes(&self, age_days: Option<i64>) -> f64 {
        match age_days {
            None => self.unknown_age_minutes,
            Some(age) if age <= 90 => self.newborn_minutes,
            Some(age) if age <= 365 => self.infant_minutes,
            Some(_) => self.toddler_minutes,
        }
    }
}

/// Where a predicted sleep stands relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepStatus {
    Overdue,
    Soon,
    Upcoming,
}

/// Minutes from now until `next_sleep_time`; negative once it has passed.
pub fn minutes_until(next_sleep_time: DateTime<Utc>, clock: &Clock) -> f64 {
    minutes_between(next_sleep_time, clock.now())
}

/// True when the predicted time passed more than the threshold ago.
pub fn is_sleep_overdue(
    next_sleep_time: DateTime<Utc>,
    age_days: Option<i64>,
    clock: &Clock,
    policy: &dyn OverdueThreshold,
) -> bool {
    let threshold = policy.sleep_threshold_minutes(age_days);
    minutes_until(next_sleep_time, clock) < -threshold
}

/// Classify a predicted sleep as overdue, soon, or upcoming.
///
/// "Soon" covers the last `min(30, threshold / 2)` minutes before the
/// predicted time and everything after it up to the overdue threshold.
pub fn sleep_status(
    next_sleep_time: DateTime<Utc>,
    age_days: Option<i64>,
    clock: &Clock,
    policy: &dyn OverdueThreshold,
) -> SleepStatus {
    let threshold = policy.sleep_threshold_minutes(age_days);
    let until = minutes_until(next_sleep_time, clock);

    if until < -threshold {
        SleepStatus::Overdue
    } else if until <= (threshold / 2.0).min(30.0) {
        SleepStatus::Soon
    } else {
        SleepStatus::Upcoming
    }
}
