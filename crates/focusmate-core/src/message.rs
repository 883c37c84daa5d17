//! Badge-gated direct messages.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::info;

use crate::db::query;
use crate::error::DomainError;
use crate::model::{Message, UnreadMessage};
use crate::now_us;
use crate::user::ensure_user;

/// Send a message, spending one of the sender's badges.
///
/// One transaction: the sender's balance (NULL read as zero) is checked,
/// decremented, and the message row inserted — or nothing happens at all.
///
/// # Errors
///
/// Returns [`DomainError::InsufficientBadges`] when the sender's balance is
/// zero, [`DomainError::UserNotFound`] when either end is unknown, or an
/// error if the write fails.
pub fn send_message(
    conn: &mut Connection,
    sender_id: i64,
    receiver_id: i64,
    content: &str,
) -> Result<Message> {
    let tx = conn
        .transaction()
        .context("begin send_message transaction")?;
    ensure_user(&tx, sender_id)?;
    ensure_user(&tx, receiver_id)?;

    let balance = query::badge_count(&tx, sender_id)?;
    if balance < 1 {
        return Err(DomainError::InsufficientBadges(sender_id).into());
    }

    tx.execute(
        "UPDATE users SET badge = COALESCE(badge, 0) - 1 WHERE user_id = ?1",
        params![sender_id],
    )
    .context("spend badge")?;

    let now = now_us();
    tx.execute(
        "INSERT INTO messages (sender_id, receiver_id, content, is_read, created_at_us) \
         VALUES (?1, ?2, ?3, 0, ?4)",
        params![sender_id, receiver_id, content, now],
    )
    .context("insert message")?;
    let id = tx.last_insert_rowid();

    tx.commit().context("commit send_message")?;
    info!(sender_id, receiver_id, id, "message sent");

    Ok(Message {
        id,
        sender_id,
        receiver_id,
        content: content.to_string(),
        is_read: false,
        created_at_us: now,
    })
}

/// The newest unread message for a receiver, if any.
///
/// Non-consuming: polling this repeatedly returns the same row until it is
/// explicitly marked read.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown receiver, or an
/// error if the read fails.
pub fn latest_unread(conn: &Connection, receiver_id: i64) -> Result<Option<UnreadMessage>> {
    ensure_user(conn, receiver_id)?;
    query::latest_unread(conn, receiver_id)
}

/// Mark one message read.
///
/// # Errors
///
/// Returns [`DomainError::MessageNotFound`] for an unknown id, or an error
/// if the write fails.
pub fn mark_read(conn: &Connection, message_id: i64) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE messages SET is_read = 1 WHERE id = ?1",
            params![message_id],
        )
        .context("mark message read")?;

    if changed == 0 {
        return Err(DomainError::MessageNotFound(message_id).into());
    }
    Ok(())
}
