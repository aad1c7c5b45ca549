//! Reference clock and guarded time arithmetic.
//!
//! Every analyzer receives a [`Clock`] instead of reading the system time, so
//! the same snapshot and clock always produce the same result. Hour-of-day
//! values are taken in the clock's UTC offset (the family's local time).

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Timelike, Utc};

use crate::error::ValidationError;

const SECONDS_PER_DAY: i64 = 86_400;

/// The instant analyses are computed against, plus the local UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl Clock {
    /// Clock pinned to the current system time, in UTC.
    ///
    /// Only call this at the outermost call site.
    pub fn system() -> Self {
        Self::fixed(Utc::now())
    }

    /// Clock pinned to an explicit instant, in UTC.
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    /// Use a different local offset for hour-of-day calculations.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert an instant to the clock's local offset.
    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// Local hour of day as a float (`hour + minute / 60`).
    pub fn hour_of_day(&self, instant: DateTime<Utc>) -> f64 {
        let local = self.local(instant);
        local.hour() as f64 + local.minute() as f64 / 60.0
    }

    /// Start of a trailing lookback window ending now.
    pub fn lookback_start(&self, days: i64) -> Result<DateTime<Utc>, ValidationError> {
        Duration::try_days(days)
            .and_then(|span| self.now.checked_sub_signed(span))
            .ok_or_else(|| ValidationError::TimeOverflow(format!("{days}-day lookback window")))
    }

    /// The most recent occurrence of a local time of day that is not in the future.
    ///
    /// The time is placed on today's local date and rolled back one day when
    /// that instant is still ahead of `now`.
    pub fn most_recent_at(&self, hour: f64) -> Result<DateTime<Utc>, ValidationError> {
        let time = time_of_day(hour)?;
        let today = self.local(self.now).date_naive();
        let candidate = self
            .offset
            .from_local_datetime(&today.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| ValidationError::TimeOverflow(format!("local time {time}")))?;

        if candidate > self.now {
            candidate
                .checked_sub_signed(Duration::days(1))
                .ok_or_else(|| ValidationError::TimeOverflow(format!("local time {time}")))
        } else {
            Ok(candidate)
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

/// Shift an instant by a fractional number of hours.
///
/// Rejects non-finite offsets and chrono overflow rather than producing a
/// bogus instant.
pub fn offset_by_hours(
    base: DateTime<Utc>,
    hours: f64,
    what: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    offset_by_minutes(base, hours * 60.0, what)
}

/// Shift an instant by a fractional number of minutes.
pub fn offset_by_minutes(
    base: DateTime<Utc>,
    minutes: f64,
    what: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    let seconds = (minutes * 60.0).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return Err(ValidationError::TimeOverflow(what.to_string()));
    }
    Duration::try_seconds(seconds as i64)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| ValidationError::TimeOverflow(what.to_string()))
}

/// Signed hours from `earlier` to `later`.
pub fn hours_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 3600.0
}

/// Signed minutes from `earlier` to `later`.
pub fn minutes_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 60.0
}

/// Convert a fractional hour (e.g. `19.5`) into a wall-clock time.
///
/// Values are clamped into a single day.
pub fn time_of_day(hour: f64) -> Result<NaiveTime, ValidationError> {
    if !hour.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "hour".to_string(),
            message: format!("{hour} is not a finite hour of day"),
        });
    }
    let seconds = ((hour * 3600.0).round() as i64).clamp(0, SECONDS_PER_DAY - 1);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).ok_or_else(|| {
        ValidationError::InvalidValue {
            field: "hour".to_string(),
            message: format!("{hour} is outside the day"),
        }
    })
}
