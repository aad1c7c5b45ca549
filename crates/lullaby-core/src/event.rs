//! Sleep event records supplied by the activity store.
//!
//! The engine treats a slice of [`SleepEvent`] as an immutable snapshot for
//! one computation. Storage adapters map their rows into this type.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::time::Clock;

/// Nap or night sleep. Older records may have no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepCategory {
    Nap,
    Night,
}

/// One sleep session for a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEvent {
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// `None` while the child is still asleep.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub sleep_category: Option<SleepCategory>,
    /// The caregiver marked this sleep as skipped.
    #[serde(default)]
    pub skipped: bool,
    /// A planned entry that has not happened yet.
    #[serde(default)]
    pub scheduled: bool,
}

impl SleepEvent {
    /// A finished sleep; the duration is derived from the two instants.
    pub fn completed(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: Some(end_time),
            duration_minutes: Some((end_time - start_time).num_minutes()),
            sleep_category: None,
            skipped: false,
            scheduled: false,
        }
    }

    /// A sleep that has started and not ended.
    pub fn in_progress(id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: None,
            duration_minutes: None,
            sleep_category: None,
            skipped: false,
            scheduled: false,
        }
    }

    /// Record that an expected sleep was skipped at `at`.
    ///
    /// Skip records are zero-length and always carry an end time.
    pub fn skip(at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time: at,
            end_time: Some(at),
            duration_minutes: Some(0),
            sleep_category: None,
            skipped: true,
            scheduled: false,
        }
    }

    pub fn with_category(mut self, category: SleepCategory) -> Self {
        self.sleep_category = Some(category);
        self
    }

    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_night(&self) -> bool {
        self.sleep_category == Some(SleepCategory::Night)
    }

    /// Recorded duration, or the span between start and end when not recorded.
    pub fn effective_duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
            .or_else(|| self.end_time.map(|end| (end - self.start_time).num_minutes()))
    }

    /// Check the record against the input contract.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(ValidationError::InvalidTimeRange {
                    id: self.id.clone(),
                    start: self.start_time,
                    end,
                });
            }
        } else if self.skipped {
            return Err(ValidationError::SkippedWithoutEnd {
                id: self.id.clone(),
            });
        }

        if let Some(minutes) = self.duration_minutes {
            if minutes < 0 {
                return Err(ValidationError::NegativeDuration {
                    id: self.id.clone(),
                    minutes,
                });
            }
        }
        Ok(())
    }
}

/// Parse a JSON array of events. Blank input is an empty history.
pub fn parse_events(json: &str) -> Result<Vec<SleepEvent>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON event snapshot from disk.
pub fn read_events_file(path: &Path) -> Result<Vec<SleepEvent>> {
    let content = std::fs::read_to_string(path)?;
    let events = parse_events(&content)?;
    tracing::debug!(count = events.len(), path = %path.display(), "loaded sleep events");
    Ok(events)
}

/// Validate a whole snapshot, stopping at the first malformed record.
pub fn validate_events(events: &[SleepEvent]) -> Result<(), ValidationError> {
    for event in events {
        if let Err(err) = event.validate() {
            tracing::warn!(event_id = %event.id, error = %err, "rejecting malformed sleep event");
            return Err(err);
        }
    }
    Ok(())
}

/// Whole days between birth and the clock's `now`.
///
/// Returns `Ok(None)` when the birth date is unknown.
pub fn age_in_days(
    birth_date: Option<DateTime<Utc>>,
    clock: &Clock,
) -> Result<Option<i64>, ValidationError> {
    let Some(birth_date) = birth_date else {
        return Ok(None);
    };
    let now = clock.now();
    if birth_date > now {
        return Err(ValidationError::BirthDateInFuture { birth_date, now });
    }
    Ok(Some((now - birth_date).num_days()))
}
