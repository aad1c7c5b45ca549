//! # Lullaby Core Library
//!
//! This library provides the sleep prediction and pattern-analysis logic for
//! Lullaby, a baby activity tracker. It is CLI-first: every query is available
//! through the standalone `lullaby-cli` binary, with any app acting as a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Guidelines**: Ordered age tables for intervals, wake windows, bedtimes
//!   and nap counts, with defaults for an unknown age
//! - **Prediction**: Next-sleep forecast blending age defaults with observed
//!   intervals, plus overdue detection behind an injectable policy
//! - **Patterns**: Wake time, bedtime, wake window, night sleep quality and a
//!   daytime nap schedule
//! - **Config**: TOML-based lookback windows, thresholds and local offset
//!
//! Every computation is a pure function of an event snapshot and an explicit
//! [`Clock`].
//!
//! ## Key Components
//!
//! - [`SleepEngine`]: Facade that applies an [`EngineConfig`] to each query
//! - [`SleepEvent`]: One sleep session as supplied by the activity store
//! - [`SleepPrediction`]: Forecast of the next sleep onset

pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod guidelines;
pub mod patterns;
pub mod prediction;
pub mod time;

pub use confidence::Confidence;
pub use config::{data_dir, parse_utc_offset, EngineConfig};
pub use engine::{InProgressSleep, SleepEngine, SleepInsights, UpcomingSleep};
pub use error::{ConfigError, CoreError, ValidationError};
pub use event::{
    age_in_days, parse_events, read_events_file, validate_events, SleepCategory, SleepEvent,
};
pub use guidelines::{guidelines_for_age, AgeGuidelines, HourRange};
pub use patterns::{
    NapPriority, NapSchedule, NapSlot, QualityTrend, SleepQualityMetrics, TimeRange,
    TimeRecommendation, WakeWindowResult,
};
pub use prediction::{
    predict_next_sleep, AgeAwareThreshold, OverdueThreshold, PatternEntry, SleepPrediction,
    SleepStatus,
};
pub use time::Clock;
