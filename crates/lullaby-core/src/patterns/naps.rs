//! Daytime nap schedule between a wake time and a bedtime.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::age_in_days;
use crate::guidelines::{nap_count_for_age, nap_duration_for_age, total_daily_sleep_goal};
use crate::time::{offset_by_hours, Clock};

/// Hours of night sleep assumed when budgeting daytime sleep.
const ASSUMED_NIGHT_SLEEP_HOURS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NapPriority {
    High,
    Medium,
    Low,
}

impl NapPriority {
    fn for_index(index: u32) -> Self {
        match index {
            0 => NapPriority::High,
            1 => NapPriority::Medium,
            _ => NapPriority::Low,
        }
    }
}

/// One planned nap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NapSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: u32,
    pub priority: NapPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NapSchedule {
    pub naps: Vec<NapSlot>,
    /// Daytime sleep budget: daily goal minus an assumed ten-hour night
    pub total_daytime_sleep_minutes: i64,
}

/// Spread the age-appropriate number of naps evenly across the day.
///
/// Nap `i` starts `(i + 1) / (count + 1)` of the way from `wake_time` to
/// `bedtime`, measured in local clock hours so a bedtime "before" the wake
/// time wraps past midnight.
pub fn find_best_daytime_nap_times(
    birth_date: Option<DateTime<Utc>>,
    bedtime: DateTime<Utc>,
    wake_time: DateTime<Utc>,
    clock: &Clock,
) -> Result<NapSchedule, ValidationError> {
    let age_days = age_in_days(birth_date, clock)?;
    let nap_count = nap_count_for_age(age_days);

    let mut hours_awake = clock.hour_of_day(bedtime) - clock.hour_of_day(wake_time);
    if hours_awake < 0.0 {
        hours_awake += 24.0;
    }
    let spacing = hours_awake / (nap_count + 1) as f64;

    let naps = (0..nap_count)
        .map(|index| {
            let start = offset_by_hours(wake_time, (index + 1) as f64 * spacing, "nap start")?;
            let duration_minutes = nap_duration_for_age(age_days, index, nap_count);
            let end = start
                .checked_add_signed(Duration::minutes(duration_minutes as i64))
                .ok_or_else(|| ValidationError::TimeOverflow("nap end".to_string()))?;
            Ok(NapSlot {
                start,
                end,
                duration_minutes,
                priority: NapPriority::for_index(index),
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let daytime_hours = (total_daily_sleep_goal(age_days) - ASSUMED_NIGHT_SLEEP_HOURS).max(0.0);
    tracing::debug!(?age_days, nap_count, hours_awake, "planned daytime naps");

    Ok(NapSchedule {
        naps,
        total_daytime_sleep_minutes: (daytime_hours * 60.0).round() as i64,
    })
}
