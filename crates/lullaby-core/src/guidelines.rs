//! Age-based pediatric sleep guidelines.
//!
//! Each guideline is a single ordered table of `(max_age_days, value)` rows.
//! A lookup returns the value of the first row whose bound covers the age,
//! falling through to the table's `over` value past the last bound. An
//! unknown age (`None`) maps to the table's neutral default, used when the
//! birth date has not been recorded.

use serde::{Deserialize, Serialize};

/// A step function over age in days.
#[derive(Debug)]
struct AgeTable<T: 'static> {
    rows: &'static [(i64, T)],
    over: T,
    unknown: T,
}

impl<T: Copy> AgeTable<T> {
    fn lookup(&self, age_days: Option<i64>) -> T {
        let Some(age) = age_days else {
            return self.unknown;
        };
        self.rows
            .iter()
            .find(|(max_age, _)| age <= *max_age)
            .map(|(_, value)| *value)
            .unwrap_or(self.over)
    }
}

/// Clock-hour range in fractional hours (`19.5` is 19:30).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourRange {
    pub early: f64,
    pub typical: f64,
    pub late: f64,
}

const fn hours(early: f64, typical: f64, late: f64) -> HourRange {
    HourRange {
        early,
        typical,
        late,
    }
}

/// Long and short nap lengths in minutes.
#[derive(Debug, Clone, Copy)]
struct NapLengths {
    long: u32,
    short: u32,
}

/// Expected hours from one sleep onset to the next.
static INTERVAL_HOURS: AgeTable<f64> = AgeTable {
    rows: &[
        (7, 2.5),
        (28, 3.0),
        (90, 3.5),
        (180, 4.0),
        (270, 4.5),
        (365, 5.0),
        (547, 6.0),
    ],
    over: 7.0,
    unknown: 3.0,
};

static WAKE_WINDOW_MINUTES: AgeTable<f64> = AgeTable {
    rows: &[
        (7, 45.0),
        (28, 60.0),
        (90, 75.0),
        (180, 120.0),
        (270, 150.0),
        (365, 180.0),
        (547, 240.0),
    ],
    over: 300.0,
    unknown: 90.0,
};

static BEDTIME_HOURS: AgeTable<HourRange> = AgeTable {
    rows: &[
        (30, hours(20.0, 21.5, 23.0)),
        (90, hours(19.5, 20.5, 22.0)),
        (180, hours(18.5, 19.5, 20.5)),
        (547, hours(18.5, 19.0, 20.0)),
    ],
    over: hours(19.0, 19.5, 20.5),
    unknown: hours(19.0, 20.0, 21.0),
};

static WAKE_TIME_HOURS: AgeTable<HourRange> = AgeTable {
    rows: &[
        (90, hours(6.0, 7.0, 8.0)),
        (365, hours(6.0, 6.5, 7.5)),
    ],
    over: hours(6.0, 7.0, 8.0),
    unknown: hours(6.0, 7.0, 8.0),
};

static NAP_COUNT: AgeTable<u32> = AgeTable {
    rows: &[(90, 4), (270, 3), (547, 2)],
    over: 1,
    unknown: 3,
};

static NAP_LENGTHS: AgeTable<NapLengths> = AgeTable {
    rows: &[
        (90, NapLengths { long: 60, short: 40 }),
        (180, NapLengths { long: 90, short: 45 }),
        (365, NapLengths { long: 90, short: 60 }),
        (547, NapLengths { long: 120, short: 90 }),
    ],
    over: NapLengths { long: 120, short: 90 },
    unknown: NapLengths { long: 60, short: 45 },
};

static DAILY_SLEEP_HOURS: AgeTable<f64> = AgeTable {
    rows: &[
        (7, 16.5),
        (28, 16.0),
        (90, 15.0),
        (180, 14.5),
        (270, 14.0),
        (365, 14.0),
        (547, 13.5),
    ],
    over: 13.0,
    unknown: 14.0,
};

/// Default length offered when quick-logging a sleep.
static QUICK_LOG_MINUTES: AgeTable<u32> = AgeTable {
    rows: &[(90, 45), (180, 75), (365, 90)],
    over: 105,
    unknown: 60,
};

/// Expected hours between sleep onsets.
pub fn interval_hours_for_age(age_days: Option<i64>) -> f64 {
    INTERVAL_HOURS.lookup(age_days)
}

/// Recommended minutes awake between sleeps.
pub fn wake_window_minutes_for_age(age_days: Option<i64>) -> f64 {
    WAKE_WINDOW_MINUTES.lookup(age_days)
}

pub fn bedtime_range_for_age(age_days: Option<i64>) -> HourRange {
    BEDTIME_HOURS.lookup(age_days)
}

pub fn wake_time_range_for_age(age_days: Option<i64>) -> HourRange {
    WAKE_TIME_HOURS.lookup(age_days)
}

/// Number of daytime naps to plan for.
pub fn nap_count_for_age(age_days: Option<i64>) -> u32 {
    NAP_COUNT.lookup(age_days)
}

/// Planned length of one nap in minutes.
///
/// The first nap of the day gets the long length; with exactly three naps
/// the second one does too.
pub fn nap_duration_for_age(age_days: Option<i64>, nap_index: u32, total_naps: u32) -> u32 {
    let lengths = NAP_LENGTHS.lookup(age_days);
    if nap_index == 0 || (total_naps == 3 && nap_index == 1) {
        lengths.long
    } else {
        lengths.short
    }
}

/// Total hours of sleep per 24h the child should get.
pub fn total_daily_sleep_goal(age_days: Option<i64>) -> f64 {
    DAILY_SLEEP_HOURS.lookup(age_days)
}

pub fn quick_log_duration_for_age(age_days: Option<i64>) -> u32 {
    QUICK_LOG_MINUTES.lookup(age_days)
}

/// Every guideline value for one age, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGuidelines {
    pub age_days: Option<i64>,
    pub interval_hours: f64,
    pub wake_window_minutes: f64,
    pub bedtime: HourRange,
    pub wake_time: HourRange,
    pub nap_count: u32,
    pub nap_durations_minutes: Vec<u32>,
    pub total_daily_sleep_hours: f64,
    pub quick_log_duration_minutes: u32,
}

pub fn guidelines_for_age(age_days: Option<i64>) -> AgeGuidelines {
    let nap_count = nap_count_for_age(age_days);
    AgeGuidelines {
        age_days,
        interval_hours: interval_hours_for_age(age_days),
        wake_window_minutes: wake_window_minutes_for_age(age_days),
        bedtime: bedtime_range_for_age(age_days),
        wake_time: wake_time_range_for_age(age_days),
        nap_count,
        nap_durations_minutes: (0..nap_count)
            .map(|i| nap_duration_for_age(age_days, i, nap_count))
            .collect(),
        total_daily_sleep_hours: total_daily_sleep_goal(age_days),
        quick_log_duration_minutes: quick_log_duration_for_age(age_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_age_defaults() {
        assert_eq!(interval_hours_for_age(None), 3.0);
        assert_eq!(wake_window_minutes_for_age(None), 90.0);
        assert_eq!(bedtime_range_for_age(None).typical, 20.0);
        assert_eq!(wake_time_range_for_age(None).typical, 7.0);
        assert_eq!(nap_count_for_age(None), 3);
        assert_eq!(nap_duration_for_age(None, 0, 3), 60);
        assert_eq!(nap_duration_for_age(None, 2, 3), 45);
        assert_eq!(total_daily_sleep_goal(None), 14.0);
        assert_eq!(quick_log_duration_for_age(None), 60);
    }

    #[test]
    fn test_newborn_interval() {
        assert_eq!(interval_hours_for_age(Some(18)), 3.0);
        assert_eq!(interval_hours_for_age(Some(28)), 3.0);
        assert_eq!(interval_hours_for_age(Some(29)), 3.5);
        assert_eq!(interval_hours_for_age(Some(0)), 2.5);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(quick_log_duration_for_age(Some(90)), 45);
        assert_eq!(quick_log_duration_for_age(Some(91)), 75);
        assert_eq!(quick_log_duration_for_age(Some(180)), 75);
        assert_eq!(quick_log_duration_for_age(Some(365)), 90);
        assert_eq!(quick_log_duration_for_age(Some(366)), 105);
    }

    #[test]
    fn test_nap_count_steps_down() {
        assert_eq!(nap_count_for_age(Some(60)), 4);
        assert_eq!(nap_count_for_age(Some(200)), 3);
        assert_eq!(nap_count_for_age(Some(400)), 2);
        assert_eq!(nap_count_for_age(Some(900)), 1);
    }

    #[test]
    fn test_second_nap_is_long_only_with_three_naps() {
        assert_eq!(nap_duration_for_age(Some(200), 1, 3), 90);
        assert_eq!(nap_duration_for_age(Some(60), 1, 4), 40);
        assert_eq!(nap_duration_for_age(Some(400), 1, 2), 90);
        assert_eq!(nap_duration_for_age(Some(400), 0, 2), 120);
    }

    #[test]
    fn test_ranges_are_ordered() {
        for age in [None, Some(0), Some(20), Some(60), Some(120), Some(300), Some(500), Some(1000)] {
            for range in [bedtime_range_for_age(age), wake_time_range_for_age(age)] {
                assert!(range.early <= range.typical && range.typical <= range.late);
            }
        }
    }

    #[test]
    fn test_guidelines_snapshot() {
        let g = guidelines_for_age(Some(200));
        assert_eq!(g.nap_count, 3);
        assert_eq!(g.nap_durations_minutes, vec![90, 90, 60]);
        assert_eq!(g.interval_hours, 4.5);
    }
}
