//! Hour-bucket splitting for focus sessions.
//!
//! A session is reported at save time as `(end, duration_seconds)` and is
//! spread backwards over the half-open interval `[end - duration, end)`,
//! cut at every top-of-hour instant. Each slice contributes its whole
//! minutes (floored) to the bucket of the calendar hour the slice starts
//! in; slices shorter than a minute contribute nothing.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::model::{FocusSegment, SessionOutcome};

/// Seconds of focused time required to earn a badge.
pub const BADGE_THRESHOLD_SECONDS: i64 = 3600;

const SECONDS_PER_HOUR: i64 = 3600;

/// Split a session into hour-aligned bucket contributions.
///
/// `duration_seconds` must be non-negative — callers validate before any
/// persistence is attempted; values of zero produce an empty split.
///
/// Whole-minute accounting is per slice: a 90-minute session that crosses
/// one hour boundary 37 minutes in yields slices of 37 and 53 minutes.
/// Sub-minute remainders are lost to flooring, so the slice sum can fall
/// short of `total_minutes` when the session straddles a boundary at a
/// non-minute-aligned instant.
#[must_use]
pub fn split_session(end: NaiveDateTime, duration_seconds: i64) -> SessionOutcome {
    let duration_seconds = duration_seconds.max(0);
    let total_minutes = duration_seconds / 60;
    let badge_earned = duration_seconds >= BADGE_THRESHOLD_SECONDS;

    let start = end - Duration::seconds(duration_seconds);
    let start_ts = start.and_utc().timestamp();
    let end_ts = end.and_utc().timestamp();

    let mut segments = Vec::new();
    let mut cursor_ts = start_ts;
    while cursor_ts < end_ts {
        let next_hour_ts = cursor_ts - cursor_ts.rem_euclid(SECONDS_PER_HOUR) + SECONDS_PER_HOUR;
        let slice_end_ts = next_hour_ts.min(end_ts);
        let minutes = (slice_end_ts - cursor_ts) / 60;

        if minutes > 0 {
            let cursor = start + Duration::seconds(cursor_ts - start_ts);
            segments.push(FocusSegment {
                date: cursor.date(),
                hour: cursor.hour(),
                minutes,
            });
        }

        cursor_ts = slice_end_ts;
    }

    SessionOutcome {
        total_minutes,
        badge_earned,
        segments,
    }
}
