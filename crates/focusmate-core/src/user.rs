//! User operations: identity, presence, and the record-status summary.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::db::query;
use crate::error::DomainError;
use crate::model::{RecordStatus, User};
use crate::now_us;

/// Reject unknown user ids before an operation writes anything.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] when the id is absent, or an error
/// if the existence query fails.
pub fn ensure_user(conn: &Connection, user_id: i64) -> Result<()> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)",
            params![user_id],
            |row| row.get(0),
        )
        .context("query user existence")?;

    if exists {
        Ok(())
    } else {
        Err(DomainError::UserNotFound(user_id).into())
    }
}

/// Create a user and return the assigned id.
///
/// The badge balance starts as NULL; every read applies the NULL-as-zero
/// rule.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g. an empty name violates the
/// schema CHECK).
pub fn create_user(conn: &mut Connection, name: &str, title: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (name, title, created_at_us) VALUES (?1, ?2, ?3)",
        params![name, title, now_us()],
    )
    .context("insert user")?;
    let user_id = conn.last_insert_rowid();
    debug!(user_id, name, "user created");
    Ok(user_id)
}

/// Flip the studying flag, stamping or clearing the presence timer.
///
/// Turning studying on records the start instant so friends can see how
/// long the run has lasted; turning it off clears it. Re-asserting an
/// already-on flag keeps the original start instant.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown user, or an error
/// if the write fails.
pub fn set_studying(conn: &Connection, user_id: i64, studying: bool) -> Result<()> {
    let changed = if studying {
        conn.execute(
            "UPDATE users \
             SET is_studying = 1, \
                 studying_since_us = COALESCE(studying_since_us, ?1) \
             WHERE user_id = ?2",
            params![now_us(), user_id],
        )
        .context("set studying on")?
    } else {
        conn.execute(
            "UPDATE users SET is_studying = 0, studying_since_us = NULL WHERE user_id = ?1",
            params![user_id],
        )
        .context("set studying off")?
    };

    if changed == 0 {
        return Err(DomainError::UserNotFound(user_id).into());
    }
    Ok(())
}

/// Fetch a user, rejecting unknown ids.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] when absent, or an error if the
/// query fails.
pub fn get_user(conn: &Connection, user_id: i64) -> Result<User> {
    query::get_user(conn, user_id)?.ok_or_else(|| DomainError::UserNotFound(user_id).into())
}

/// The record-status summary: badge balance, presence, and today's focus
/// minutes.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown user, or an error
/// if a query fails.
pub fn record_status(conn: &Connection, user_id: i64, today: NaiveDate) -> Result<RecordStatus> {
    let user = get_user(conn, user_id)?;
    let hours = query::hourly_minutes(conn, user_id, today)?;

    Ok(RecordStatus {
        user_id,
        badge_count: user.badge_count(),
        is_studying: user.is_studying,
        minutes_today: hours.iter().sum(),
    })
}
