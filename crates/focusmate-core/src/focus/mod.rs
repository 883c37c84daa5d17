//! Focus session persistence and record reads.

pub mod bucket;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params};
use tracing::info;

use crate::db::query;
use crate::error::DomainError;
use crate::model::{DailyTotal, HOURS_PER_DAY, SessionOutcome};
use crate::user::ensure_user;

/// Save a completed focus session.
///
/// Validates the owner and duration before any write (fail closed), then in
/// one transaction: upserts every hour-bucket contribution additively and,
/// when the session reaches the one-hour threshold, increments the owner's
/// badge balance by one (a NULL balance counts as zero).
///
/// A bucket never stores more than 60 minutes: contributions that would
/// overflow the hour are clamped, so overlapping sessions saved for the
/// same hour cannot corrupt the record. Re-running a failed save is safe —
/// either the whole batch committed or none of it did.
///
/// `note` is transient session metadata; it is logged and dropped.
///
/// # Errors
///
/// Returns [`DomainError::NegativeDuration`] or [`DomainError::UserNotFound`]
/// before any write, or an error if the batch fails.
pub fn save_session(
    conn: &mut Connection,
    user_id: i64,
    end: NaiveDateTime,
    duration_seconds: i64,
    note: Option<&str>,
) -> Result<SessionOutcome> {
    if duration_seconds < 0 {
        return Err(DomainError::NegativeDuration(duration_seconds).into());
    }

    let tx = conn
        .transaction()
        .context("begin save_session transaction")?;
    ensure_user(&tx, user_id)?;

    let outcome = bucket::split_session(end, duration_seconds);

    for segment in &outcome.segments {
        tx.execute(
            "INSERT INTO focus_buckets (user_id, record_date, record_hour, focus_minutes) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(user_id, record_date, record_hour) \
             DO UPDATE SET focus_minutes = MIN(60, focus_minutes + excluded.focus_minutes)",
            params![
                user_id,
                segment.date.to_string(),
                segment.hour,
                segment.minutes
            ],
        )
        .with_context(|| format!("upsert bucket {} h{}", segment.date, segment.hour))?;
    }

    if outcome.badge_earned {
        tx.execute(
            "UPDATE users SET badge = COALESCE(badge, 0) + 1 WHERE user_id = ?1",
            params![user_id],
        )
        .context("increment badge")?;
    }

    tx.commit().context("commit save_session")?;
    info!(
        user_id,
        minutes = outcome.total_minutes,
        badge = outcome.badge_earned,
        note = note.unwrap_or(""),
        "focus session saved"
    );

    Ok(outcome)
}

/// One day's focus record as 24 hourly minute totals.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the read fails.
pub fn daily_record(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> Result<[i64; HOURS_PER_DAY]> {
    ensure_user(conn, user_id)?;
    query::hourly_minutes(conn, user_id, date)
}

/// Per-day focus totals over the inclusive range `[from, to]`.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the read fails.
pub fn range_totals(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyTotal>> {
    ensure_user(conn, user_id)?;
    query::daily_totals(conn, user_id, from, to)
}
