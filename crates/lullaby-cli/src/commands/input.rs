//! Flags shared by every command that reads a sleep history.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Args;
use lullaby_core::{
    parse_events, parse_utc_offset, read_events_file, Clock, EngineConfig, SleepEvent,
};

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON array of sleep events ("-" reads stdin)
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    #[command(flatten)]
    pub child: ChildArgs,
}

/// Birth date and reference clock.
#[derive(Args, Debug, Clone)]
pub struct ChildArgs {
    /// Birth date (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_birth_date)]
    pub birth_date: Option<DateTime<Utc>>,

    /// Reference time (RFC 3339, defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,

    /// Local UTC offset such as +02:00 (defaults to config)
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    pub offset: Option<FixedOffset>,
}

impl ChildArgs {
    pub fn clock(&self, config: &EngineConfig) -> Result<Clock, Box<dyn std::error::Error>> {
        let clock = match self.now {
            Some(now) => Clock::fixed(now),
            None => Clock::system(),
        };
        let offset = match self.offset {
            Some(offset) => offset,
            None => config.offset()?,
        };
        Ok(clock.with_offset(offset))
    }
}

impl InputArgs {
    pub fn load_events(&self) -> Result<Vec<SleepEvent>, Box<dyn std::error::Error>> {
        read_events(&self.events)
    }
}

/// Read a JSON event array from a file, or stdin for `-`.
pub fn read_events(source: &Path) -> Result<Vec<SleepEvent>, Box<dyn std::error::Error>> {
    if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        let events = parse_events(&buf)?;
        tracing::debug!(count = events.len(), "loaded sleep events from stdin");
        return Ok(events);
    }
    read_events_path(source)
}

pub fn read_events_path(path: &Path) -> Result<Vec<SleepEvent>, Box<dyn std::error::Error>> {
    Ok(read_events_file(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?)
}

pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{value}': {e}"))
}

pub fn parse_birth_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = parse_instant(value) {
        return Ok(instant);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid birth date '{value}': expected RFC 3339 or YYYY-MM-DD"))
}

fn parse_offset(value: &str) -> Result<FixedOffset, String> {
    parse_utc_offset(value).map_err(|e| e.to_string())
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_birth_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 14, 0, 0, 0).unwrap();
        assert_eq!(parse_birth_date("2025-01-14").unwrap(), expected);
        assert_eq!(parse_birth_date("2025-01-14T02:00:00+02:00").unwrap(), expected);
        assert!(parse_birth_date("14/01/2025").is_err());
    }

    #[test]
    fn test_clock_prefers_flag_offset() {
        let args = ChildArgs {
            birth_date: None,
            now: Some(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()),
            offset: FixedOffset::east_opt(3600),
        };
        let clock = args.clock(&EngineConfig::default()).unwrap();
        assert_eq!(clock.offset().local_minus_utc(), 3600);
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_read_events_path_accepts_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"events-\xff.json"));
        let record = SleepEvent::skip(Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap());
        std::fs::write(&path, serde_json::to_string(&vec![record.clone()]).unwrap()).unwrap();

        let events = read_events_path(&path).unwrap();
        assert_eq!(events, vec![record]);
    }

    #[test]
    fn test_read_events_path_names_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_events_path(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
