use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of hourly buckets in one calendar day.
pub const HOURS_PER_DAY: usize = 24;

/// One hour-aligned slice of a focus session.
///
/// `minutes` is the whole-minute contribution to the bucket keyed by
/// `(date, hour)`; zero-minute slices are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSegment {
    pub date: NaiveDate,
    /// Hour of day, `0..=23`.
    pub hour: u32,
    pub minutes: i64,
}

/// Result of saving one focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Whole minutes in the session (`duration_seconds / 60`, floored).
    pub total_minutes: i64,
    /// True when the session crossed the one-hour reward threshold.
    pub badge_earned: bool,
    /// The per-bucket contributions that were upserted.
    pub segments: Vec<FocusSegment>,
}

/// Accumulated focus minutes for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub minutes: i64,
}
