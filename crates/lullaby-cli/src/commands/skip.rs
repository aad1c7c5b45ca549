use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use lullaby_core::{Clock, SleepEngine, SleepEvent};

use super::input::{parse_instant, print_json, read_events_path};

#[derive(Args, Debug, Clone)]
pub struct SkipArgs {
    /// JSON event file to append the skip record to (created if missing)
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    /// When the sleep was skipped (RFC 3339, defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

pub fn run(args: SkipArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut events: Vec<SleepEvent> = if args.events.exists() {
        read_events_path(&args.events)?
    } else {
        Vec::new()
    };

    let clock = match args.at {
        Some(at) => Clock::fixed(at),
        None => Clock::system(),
    };
    let record = SleepEngine::default().skip_sleep(&clock);
    events.push(record.clone());

    std::fs::write(&args.events, serde_json::to_string_pretty(&events)?)?;
    tracing::info!(id = %record.id, path = %args.events.display(), "recorded skipped sleep");
    print_json(&record)
}
