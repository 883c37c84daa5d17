//! Photo storage: raw bytes per user, nothing fancier.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::db::query;
use crate::db::query::PictureInfo;
use crate::error::DomainError;
use crate::now_us;
use crate::user::ensure_user;

/// Store one picture's raw bytes for a user, returning the assigned id.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the write fails.
pub fn add_picture(conn: &Connection, user_id: i64, bytes: &[u8]) -> Result<i64> {
    ensure_user(conn, user_id)?;

    conn.execute(
        "INSERT INTO pictures (user_id, img, created_at_us) VALUES (?1, ?2, ?3)",
        params![user_id, bytes, now_us()],
    )
    .context("insert picture")?;
    let id = conn.last_insert_rowid();
    debug!(user_id, id, byte_len = bytes.len(), "picture stored");
    Ok(id)
}

/// Metadata for a user's stored pictures.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the read fails.
pub fn list_pictures(conn: &Connection, user_id: i64) -> Result<Vec<PictureInfo>> {
    ensure_user(conn, user_id)?;
    query::list_pictures(conn, user_id)
}

/// Raw bytes of one picture.
///
/// # Errors
///
/// Returns [`DomainError::PictureNotFound`] for an unknown id, or an error
/// if the read fails.
pub fn get_picture(conn: &Connection, id: i64) -> Result<Vec<u8>> {
    query::get_picture(conn, id)?.ok_or_else(|| DomainError::PictureNotFound(id).into())
}
