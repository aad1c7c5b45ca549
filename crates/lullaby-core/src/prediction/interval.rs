//! Gaps between consecutive sleep onsets.

use std::borrow::Borrow;

use crate::event::SleepEvent;
use crate::time::hours_between;

/// Most sessions the predictor looks at.
pub const MAX_RECENT_SESSIONS: usize = 10;

/// Hours between each event's start and the start of the next newer event.
///
/// `events` must already be sorted by `start_time`, most recent first, and
/// limited to [`MAX_RECENT_SESSIONS`]. Index 0 is always `None`; index `i`
/// holds the gap from `events[i]` to `events[i - 1]`. Unrealistic gaps are
/// kept here so positions line up with `events`; see [`valid_intervals`].
pub fn compute_intervals<E: Borrow<SleepEvent>>(events: &[E]) -> Vec<Option<f64>> {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            if i == 0 {
                None
            } else {
                let newer = events[i - 1].borrow();
                Some(hours_between(newer.start_time, event.borrow().start_time))
            }
        })
        .collect()
}

/// Whether a gap is plausible between two sleeps.
pub fn is_valid_interval(hours: f64) -> bool {
    hours > 0.0 && hours < 24.0
}

/// The plausible gaps, most recent first.
pub fn valid_intervals(intervals: &[Option<f64>]) -> Vec<f64> {
    intervals
        .iter()
        .flatten()
        .copied()
        .filter(|h| is_valid_interval(*h))
        .collect()
}
