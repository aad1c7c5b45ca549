//! Next-sleep prediction.
//!
//! - **Intervals**: gaps between consecutive sleep onsets
//! - **Predictor**: blended forecast with a confidence tier
//! - **Overdue**: injected threshold policy and status classification
//! - **Duration**: suggested quick-log duration

mod duration;
mod interval;
mod overdue;
mod predictor;

pub use duration::suggest_duration;
pub use interval::{compute_intervals, is_valid_interval, valid_intervals, MAX_RECENT_SESSIONS};
pub use overdue::{
    is_sleep_overdue, minutes_until, sleep_status, AgeAwareThreshold, OverdueThreshold,
    SleepStatus,
};
pub use predictor::{predict_next_sleep, PatternEntry, SleepPrediction};
