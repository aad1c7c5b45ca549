use chrono::{DateTime, Utc};
use lullaby_core::{EngineConfig, SleepEngine, SleepStatus};
use serde::Serialize;

use super::input::{print_json, InputArgs};

/// Which view of the forecast to print.
#[derive(Debug, Clone, Copy)]
pub enum View {
    Prediction,
    Upcoming,
    Status,
}

#[derive(Serialize)]
struct StatusLine {
    status: SleepStatus,
    next_sleep_time: DateTime<Utc>,
    minutes_until: i64,
    asleep: bool,
}

pub fn run(view: View, input: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let clock = input.child.clock(&config)?;
    let events = input.load_events()?;
    let engine = SleepEngine::new(config);
    let birth_date = input.child.birth_date;

    match view {
        View::Prediction => print_json(&engine.predict(&events, birth_date, &clock)?)?,
        View::Upcoming => print_json(&engine.upcoming(&events, birth_date, &clock)?)?,
        View::Status => {
            let upcoming = engine.upcoming(&events, birth_date, &clock)?;
            print_json(&StatusLine {
                status: upcoming.status,
                next_sleep_time: upcoming.prediction.next_sleep_time,
                minutes_until: upcoming.minutes_until,
                asleep: upcoming.in_progress.is_some(),
            })?;
        }
    }
    Ok(())
}
