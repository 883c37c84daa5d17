//! SQLite query helpers for the focusmate store.
//!
//! Provides typed Rust structs and composable query functions for the read
//! paths: deadline rows in reconciliation order, user/badge lookups, friend
//! presence, hourly focus records, the unread-message poll, and pictures.
//!
//! All functions take a shared `&Connection` reference and return
//! `anyhow::Result<T>` with typed structs (never raw rows).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params, params_from_iter, types::Type};

use crate::model::{
    DailyTotal, DeadlineItem, FriendStatus, HOURS_PER_DAY, Message, UnreadMessage, User,
};

/// Metadata for one stored picture (bytes fetched separately).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PictureInfo {
    pub id: i64,
    pub user_id: i64,
    pub byte_len: i64,
    pub created_at_us: i64,
}

fn parse_date_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    raw.parse::<NaiveDate>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error))
    })
}

fn row_to_deadline(row: &Row<'_>) -> rusqlite::Result<DeadlineItem> {
    let due_date: Option<String> = row.get(3)?;
    let due_date = match due_date {
        Some(raw) => Some(parse_date_column(3, &raw)?),
        None => None,
    };

    Ok(DeadlineItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        task: row.get(2)?,
        due_date,
        is_done: row.get(4)?,
        is_doing: row.get(5)?,
        display_order: row.get(6)?,
        created_at_us: row.get(7)?,
        updated_at_us: row.get(8)?,
    })
}

const DEADLINE_COLUMNS: &str =
    "id, user_id, task, due_date, is_done, is_doing, display_order, created_at_us, updated_at_us";

/// Fetch one user's deadline items in reconciliation order.
///
/// Rows come back ascending by `(display_order, id)`; the id tie-break makes
/// reconciliation deterministic even when stored orders collide (all done
/// items share `-1`, and explicit reorders may write duplicates).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_deadlines_raw(conn: &Connection, user_id: i64) -> Result<Vec<DeadlineItem>> {
    let sql = format!(
        "SELECT {DEADLINE_COLUMNS} FROM deadlines \
         WHERE user_id = ?1 \
         ORDER BY display_order ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql).context("prepare list_deadlines query")?;
    let rows = stmt
        .query_map(params![user_id], row_to_deadline)
        .context("execute list_deadlines query")?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.context("read deadline row")?);
    }
    Ok(items)
}

/// Fetch a single deadline item owned by `user_id`.
///
/// Returns `None` if no such item exists for that owner.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_deadline(conn: &Connection, user_id: i64, id: i64) -> Result<Option<DeadlineItem>> {
    let sql = format!("SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE id = ?1 AND user_id = ?2");

    let result = conn.query_row(&sql, params![id, user_id], row_to_deadline);
    match result {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_deadline for item {id}")),
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        name: row.get(1)?,
        title: row.get(2)?,
        badge: row.get(3)?,
        is_studying: row.get(4)?,
        studying_since_us: row.get(5)?,
        created_at_us: row.get(6)?,
    })
}

/// Fetch a user by id, `None` when absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT user_id, name, title, badge, is_studying, studying_since_us, created_at_us \
         FROM users WHERE user_id = ?1",
        params![user_id],
        row_to_user,
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_user for {user_id}")),
    }
}

/// Badge balance for a user, reading a NULL column as 0.
///
/// # Errors
///
/// Returns an error if the user does not exist or the query fails.
pub fn badge_count(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(badge, 0) FROM users WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .context(format!("badge_count for user {user_id}"))
}

/// Ids of everyone `user_id` has added as a friend, ascending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn friend_ids(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare("SELECT friend_id FROM friends WHERE user_id = ?1 ORDER BY friend_id")
        .context("prepare friend_ids query")?;
    let rows = stmt
        .query_map(params![user_id], |row| row.get(0))
        .context("execute friend_ids query")?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.context("read friend id")?);
    }
    Ok(ids)
}

/// Presence rows for a set of user ids.
///
/// `current_timer_seconds` is derived from `studying_since_us` against
/// `now_us`; it is `None` for idle users. Unknown ids are silently absent
/// from the result.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn friend_statuses(conn: &Connection, ids: &[i64], now_us: i64) -> Result<Vec<FriendStatus>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=ids.len())
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT user_id, name, is_studying, studying_since_us \
         FROM users WHERE user_id IN ({placeholders}) \
         ORDER BY user_id"
    );

    let mut stmt = conn
        .prepare(&sql)
        .context("prepare friend_statuses query")?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), |row| {
            let is_studying: bool = row.get(2)?;
            let since_us: Option<i64> = row.get(3)?;
            Ok(FriendStatus {
                friend_id: row.get(0)?,
                name: row.get(1)?,
                is_studying,
                current_timer_seconds: match since_us {
                    Some(since) if is_studying => Some((now_us - since).max(0) / 1_000_000),
                    _ => None,
                },
            })
        })
        .context("execute friend_statuses query")?;

    let mut statuses = Vec::new();
    for row in rows {
        statuses.push(row.context("read friend status row")?);
    }
    Ok(statuses)
}

/// Accumulated minutes for one `(user, date, hour)` bucket, `None` when the
/// bucket has never been written.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn bucket_minutes(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    hour: u32,
) -> Result<Option<i64>> {
    let result = conn.query_row(
        "SELECT focus_minutes FROM focus_buckets \
         WHERE user_id = ?1 AND record_date = ?2 AND record_hour = ?3",
        params![user_id, date.to_string(), hour],
        |row| row.get(0),
    );
    match result {
        Ok(minutes) => Ok(Some(minutes)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("bucket_minutes for user {user_id} {date} h{hour}")),
    }
}

/// One day's focus record as a 24-slot hourly array of minutes.
///
/// Hours with no bucket read as 0.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn hourly_minutes(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> Result<[i64; HOURS_PER_DAY]> {
    let mut stmt = conn
        .prepare(
            "SELECT record_hour, focus_minutes FROM focus_buckets \
             WHERE user_id = ?1 AND record_date = ?2",
        )
        .context("prepare hourly_minutes query")?;
    let rows = stmt
        .query_map(params![user_id, date.to_string()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })
        .context("execute hourly_minutes query")?;

    let mut hours = [0_i64; HOURS_PER_DAY];
    for row in rows {
        let (hour, minutes) = row.context("read hourly bucket row")?;
        if let Ok(slot) = usize::try_from(hour) {
            if slot < HOURS_PER_DAY {
                hours[slot] = minutes;
            }
        }
    }
    Ok(hours)
}

/// Per-day focus totals over the inclusive date range `[from, to]`.
///
/// Days with no buckets are omitted.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn daily_totals(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyTotal>> {
    let mut stmt = conn
        .prepare(
            "SELECT record_date, SUM(focus_minutes) FROM focus_buckets \
             WHERE user_id = ?1 AND record_date >= ?2 AND record_date <= ?3 \
             GROUP BY record_date \
             ORDER BY record_date",
        )
        .context("prepare daily_totals query")?;
    let rows = stmt
        .query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                let raw: String = row.get(0)?;
                Ok((parse_date_column(0, &raw)?, row.get::<_, i64>(1)?))
            },
        )
        .context("execute daily_totals query")?;

    let mut totals = Vec::new();
    for row in rows {
        let (date, minutes) = row.context("read daily total row")?;
        totals.push(DailyTotal { date, minutes });
    }
    Ok(totals)
}

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        content: row.get(3)?,
        is_read: row.get(4)?,
        created_at_us: row.get(5)?,
    })
}

/// Fetch a message by id, `None` when absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_message(conn: &Connection, id: i64) -> Result<Option<Message>> {
    let result = conn.query_row(
        "SELECT id, sender_id, receiver_id, content, is_read, created_at_us \
         FROM messages WHERE id = ?1",
        params![id],
        row_to_message,
    );
    match result {
        Ok(message) => Ok(Some(message)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_message for {id}")),
    }
}

/// The newest unread message for a receiver, joined with the sender's name.
///
/// This is the poll the client notification loop runs; it does NOT mark the
/// message read — that is a separate explicit operation.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn latest_unread(conn: &Connection, receiver_id: i64) -> Result<Option<UnreadMessage>> {
    let result = conn.query_row(
        "SELECT m.id, m.sender_id, u.name, m.content, m.created_at_us \
         FROM messages m \
         INNER JOIN users u ON u.user_id = m.sender_id \
         WHERE m.receiver_id = ?1 AND m.is_read = 0 \
         ORDER BY m.id DESC \
         LIMIT 1",
        params![receiver_id],
        |row| {
            Ok(UnreadMessage {
                id: row.get(0)?,
                sender_id: row.get(1)?,
                sender_name: row.get(2)?,
                content: row.get(3)?,
                created_at_us: row.get(4)?,
            })
        },
    );
    match result {
        Ok(message) => Ok(Some(message)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("latest_unread for receiver {receiver_id}")),
    }
}

/// Metadata for all pictures a user has stored, ascending by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pictures(conn: &Connection, user_id: i64) -> Result<Vec<PictureInfo>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_id, length(img), created_at_us \
             FROM pictures WHERE user_id = ?1 \
             ORDER BY id",
        )
        .context("prepare list_pictures query")?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(PictureInfo {
                id: row.get(0)?,
                user_id: row.get(1)?,
                byte_len: row.get(2)?,
                created_at_us: row.get(3)?,
            })
        })
        .context("execute list_pictures query")?;

    let mut pictures = Vec::new();
    for row in rows {
        pictures.push(row.context("read picture row")?);
    }
    Ok(pictures)
}

/// Raw bytes of one stored picture, `None` when absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_picture(conn: &Connection, id: i64) -> Result<Option<Vec<u8>>> {
    let result = conn.query_row(
        "SELECT img FROM pictures WHERE id = ?1",
        params![id],
        |row| row.get(0),
    );
    match result {
        Ok(bytes) => Ok(Some(bytes)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_picture for {id}")),
    }
}
