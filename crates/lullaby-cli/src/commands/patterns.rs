use clap::Args;
use lullaby_core::patterns::{
    analyze_night_sleep_quality, analyze_optimal_bedtime, analyze_optimal_wake_time,
    calculate_wake_windows,
};
use lullaby_core::{EngineConfig, SleepEngine};

use super::input::{print_json, InputArgs};

#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Days of history to analyze (defaults to config)
    #[arg(long)]
    pub lookback_days: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub enum Analysis {
    WakeTime,
    Bedtime,
    WakeWindow,
    Quality,
}

pub fn run(analysis: Analysis, args: PatternArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let clock = args.input.child.clock(&config)?;
    let events = args.input.load_events()?;
    let engine = SleepEngine::new(config);
    engine.validate(&events)?;

    let lookback = &engine.config().lookback;
    let birth_date = args.input.child.birth_date;
    let days = |configured: i64| args.lookback_days.unwrap_or(configured);
    if let Some(days) = args.lookback_days {
        if days < 1 {
            return Err(format!("--lookback-days must be at least 1, got {days}").into());
        }
    }

    match analysis {
        Analysis::WakeTime => print_json(&analyze_optimal_wake_time(
            &events,
            birth_date,
            &clock,
            days(lookback.wake_time_days),
        )?),
        Analysis::Bedtime => print_json(&analyze_optimal_bedtime(
            &events,
            birth_date,
            &clock,
            days(lookback.bedtime_days),
        )?),
        Analysis::WakeWindow => print_json(&calculate_wake_windows(
            &events,
            birth_date,
            &clock,
            days(lookback.wake_window_days),
        )?),
        Analysis::Quality => print_json(&analyze_night_sleep_quality(
            &events,
            &clock,
            days(lookback.quality_days),
        )?),
    }
}

/// Nap plan between the recommended wake time and bedtime.
pub fn run_naps(input: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let clock = input.child.clock(&config)?;
    let events = input.load_events()?;
    let schedule = SleepEngine::new(config).naps(&events, input.child.birth_date, &clock)?;
    print_json(&schedule)
}

pub fn run_insights(input: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let clock = input.child.clock(&config)?;
    let events = input.load_events()?;
    let insights = SleepEngine::new(config).insights(&events, input.child.birth_date, &clock)?;
    print_json(&insights)
}
