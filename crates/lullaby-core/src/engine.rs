//! High-level entry point over the prediction and pattern analyzers.
//!
//! [`SleepEngine`] owns an [`EngineConfig`] and threads its lookback windows
//! and overdue policy through every query. It holds no other state: each
//! call works on the event snapshot and [`Clock`] it is given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::event::{age_in_days, validate_events, SleepEvent};
use crate::guidelines::{guidelines_for_age, AgeGuidelines};
use crate::patterns::{
    analyze_night_sleep_quality, analyze_optimal_bedtime, analyze_optimal_wake_time,
    calculate_wake_windows, find_best_daytime_nap_times, NapSchedule, SleepQualityMetrics,
    TimeRecommendation, WakeWindowResult,
};
use crate::prediction::{
    minutes_until, predict_next_sleep, sleep_status, AgeAwareThreshold, SleepPrediction,
    SleepStatus,
};
use crate::time::{minutes_between, Clock};

/// A sleep that has started and not ended yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InProgressSleep {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub elapsed_minutes: i64,
}

/// Forecast plus where it stands right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSleep {
    pub prediction: SleepPrediction,
    pub status: SleepStatus,
    /// Negative once the predicted time has passed
    pub minutes_until: i64,
    pub in_progress: Option<InProgressSleep>,
}

/// Every analysis for one child in a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepInsights {
    pub generated_at: DateTime<Utc>,
    pub age_days: Option<i64>,
    pub prediction: SleepPrediction,
    pub wake_time: TimeRecommendation,
    pub bedtime: TimeRecommendation,
    pub wake_window: WakeWindowResult,
    pub quality: SleepQualityMetrics,
    pub naps: NapSchedule,
}

#[derive(Debug, Clone, Default)]
pub struct SleepEngine {
    config: EngineConfig,
}

impl SleepEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn policy(&self) -> AgeAwareThreshold {
        self.config.overdue.policy()
    }

    /// Reject malformed records before any analysis runs.
    pub fn validate(&self, events: &[SleepEvent]) -> Result<()> {
        validate_events(events)?;
        Ok(())
    }

    /// Forecast the next sleep using the configured overdue policy.
    pub fn predict(
        &self,
        events: &[SleepEvent],
        birth_date: Option<DateTime<Utc>>,
        clock: &Clock,
    ) -> Result<SleepPrediction> {
        self.validate(events)?;
        let age_days = age_in_days(birth_date, clock)?;
        Ok(predict_next_sleep(events, age_days, clock, &self.policy())?)
    }

    /// Forecast with status and the sleep currently running, if any.
    pub fn upcoming(
        &self,
        events: &[SleepEvent],
        birth_date: Option<DateTime<Utc>>,
        clock: &Clock,
    ) -> Result<UpcomingSleep> {
        self.validate(events)?;
        let age_days = age_in_days(birth_date, clock)?;
        let policy = self.policy();
        let prediction = predict_next_sleep(events, age_days, clock, &policy)?;

        let in_progress = events
            .iter()
            .filter(|e| e.is_in_progress() && !e.scheduled)
            .max_by_key(|e| e.start_time)
            .map(|e| InProgressSleep {
                id: e.id.clone(),
                start_time: e.start_time,
                elapsed_minutes: minutes_between(clock.now(), e.start_time).max(0.0).floor()
                    as i64,
            });

        let status = sleep_status(prediction.next_sleep_time, age_days, clock, &policy);
        let until = minutes_until(prediction.next_sleep_time, clock).round() as i64;
        tracing::debug!(?status, until, asleep = in_progress.is_some(), "upcoming sleep");

        Ok(UpcomingSleep {
            prediction,
            status,
            minutes_until: until,
            in_progress,
        })
    }

    /// Run every analyzer with the configured lookback windows.
    pub fn insights(
        &self,
        events: &[SleepEvent],
        birth_date: Option<DateTime<Utc>>,
        clock: &Clock,
    ) -> Result<SleepInsights> {
        self.validate(events)?;
        let age_days = age_in_days(birth_date, clock)?;
        let lookback = &self.config.lookback;

        let prediction = predict_next_sleep(events, age_days, clock, &self.policy())?;
        let wake_time =
            analyze_optimal_wake_time(events, birth_date, clock, lookback.wake_time_days)?;
        let bedtime = analyze_optimal_bedtime(events, birth_date, clock, lookback.bedtime_days)?;
        let wake_window =
            calculate_wake_windows(events, birth_date, clock, lookback.wake_window_days)?;
        let quality = analyze_night_sleep_quality(events, clock, lookback.quality_days)?;
        let naps = nap_schedule(birth_date, &wake_time, &bedtime, clock)?;

        Ok(SleepInsights {
            generated_at: clock.now(),
            age_days,
            prediction,
            wake_time,
            bedtime,
            wake_window,
            quality,
            naps,
        })
    }

    /// Daytime naps between the recommended wake time and bedtime.
    pub fn naps(
        &self,
        events: &[SleepEvent],
        birth_date: Option<DateTime<Utc>>,
        clock: &Clock,
    ) -> Result<NapSchedule> {
        self.validate(events)?;
        let lookback = &self.config.lookback;
        let wake_time =
            analyze_optimal_wake_time(events, birth_date, clock, lookback.wake_time_days)?;
        let bedtime = analyze_optimal_bedtime(events, birth_date, clock, lookback.bedtime_days)?;
        nap_schedule(birth_date, &wake_time, &bedtime, clock)
    }

    /// A skip record for the storage layer to persist.
    pub fn skip_sleep(&self, clock: &Clock) -> SleepEvent {
        SleepEvent::skip(clock.now())
    }

    pub fn guidelines(&self, birth_date: Option<DateTime<Utc>>, clock: &Clock) -> Result<AgeGuidelines> {
        let age_days = age_in_days(birth_date, clock)?;
        Ok(guidelines_for_age(age_days))
    }
}

fn nap_schedule(
    birth_date: Option<DateTime<Utc>>,
    wake_time: &TimeRecommendation,
    bedtime: &TimeRecommendation,
    clock: &Clock,
) -> Result<NapSchedule> {
    Ok(find_best_daytime_nap_times(
        birth_date,
        bedtime.recommended_time,
        wake_time.recommended_time,
        clock,
    )?)
}
