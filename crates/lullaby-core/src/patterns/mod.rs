//! Sleep pattern analysis.
//!
//! This module derives recommendations from a lookback window of history,
//! each blended with age-based defaults and graded by confidence:
//! recommended wake time and bedtime, wake-window length, night sleep
//! consistency, and a daytime nap schedule.

mod naps;
mod quality;
mod stats;
mod time_of_day;
mod wake_window;

pub use naps::{find_best_daytime_nap_times, NapPriority, NapSchedule, NapSlot};
pub use quality::{analyze_night_sleep_quality, QualityTrend, SleepQualityMetrics};
pub use time_of_day::{
    analyze_optimal_bedtime, analyze_optimal_wake_time, TimeRange, TimeRecommendation,
};
pub use wake_window::{calculate_wake_windows, WakeWindowResult};

/// Default lookback windows, in days.
pub mod lookback {
    pub use super::quality::DEFAULT_LOOKBACK_DAYS as QUALITY;
    pub use super::time_of_day::DEFAULT_LOOKBACK_DAYS as TIME_OF_DAY;
    pub use super::wake_window::DEFAULT_LOOKBACK_DAYS as WAKE_WINDOW;
}
