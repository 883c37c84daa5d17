//! Deadline list operations.
//!
//! Every mutation here is one transaction; the list read additionally runs
//! the [`reconcile`] pass and persists whatever corrective writes it
//! produced, so callers always observe dense ranks regardless of what the
//! last completion toggle or explicit reorder left behind.

pub mod reconcile;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::db::query;
use crate::error::DomainError;
use crate::model::{DONE_ORDER, DeadlineItem};
use crate::now_us;
use crate::user::ensure_user;
use reconcile::{OrderRow, apply_order};

/// Create a new item at the end of the user's list.
///
/// The new rank is one past the highest rank currently held by an
/// incomplete item (1 for an empty or fully-completed list).
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the write fails.
pub fn add_item(
    conn: &mut Connection,
    user_id: i64,
    task: &str,
    due_date: Option<NaiveDate>,
) -> Result<DeadlineItem> {
    let tx = conn.transaction().context("begin add_item transaction")?;
    ensure_user(&tx, user_id)?;

    let max_order: i64 = tx
        .query_row(
            "SELECT COALESCE(MAX(display_order), 0) FROM deadlines \
             WHERE user_id = ?1 AND is_done = 0",
            params![user_id],
            |row| row.get(0),
        )
        .context("query max display_order")?;

    let now = now_us();
    let order = max_order + 1;
    tx.execute(
        "INSERT INTO deadlines (
            user_id, task, due_date, is_done, is_doing, display_order,
            created_at_us, updated_at_us
         ) VALUES (?1, ?2, ?3, 0, 0, ?4, ?5, ?5)",
        params![user_id, task, due_date.map(|d| d.to_string()), order, now],
    )
    .context("insert deadline item")?;
    let id = tx.last_insert_rowid();

    tx.commit().context("commit add_item")?;
    debug!(user_id, id, order, "deadline item added");

    Ok(DeadlineItem {
        id,
        user_id,
        task: task.to_string(),
        due_date,
        is_done: false,
        is_doing: false,
        display_order: order,
        created_at_us: now,
        updated_at_us: now,
    })
}

/// Update an item's task text and due date.
///
/// # Errors
///
/// Returns [`DomainError::DeadlineNotFound`] when the item does not exist
/// for this owner, or an error if the write fails.
pub fn edit_item(
    conn: &Connection,
    user_id: i64,
    id: i64,
    task: &str,
    due_date: Option<NaiveDate>,
) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE deadlines SET task = ?1, due_date = ?2, updated_at_us = ?3 \
             WHERE id = ?4 AND user_id = ?5",
            params![task, due_date.map(|d| d.to_string()), now_us(), id, user_id],
        )
        .context("update deadline item")?;

    if changed == 0 {
        return Err(DomainError::DeadlineNotFound(id).into());
    }
    Ok(())
}

/// Toggle an item's completion flag.
///
/// Both directions force `display_order` to the `-1` sentinel; an un-done
/// item re-enters the ranked list at the top on the next reconcile.
/// Completing an item also clears its "doing" marker.
///
/// # Errors
///
/// Returns [`DomainError::DeadlineNotFound`] when the item does not exist
/// for this owner, or an error if the write fails.
pub fn set_done(conn: &Connection, user_id: i64, id: i64, done: bool) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE deadlines \
             SET is_done = ?1, display_order = ?2, \
                 is_doing = CASE WHEN ?1 THEN 0 ELSE is_doing END, \
                 updated_at_us = ?3 \
             WHERE id = ?4 AND user_id = ?5",
            params![done, DONE_ORDER, now_us(), id, user_id],
        )
        .context("update deadline completion")?;

    if changed == 0 {
        return Err(DomainError::DeadlineNotFound(id).into());
    }
    debug!(user_id, id, done, "deadline completion toggled");
    Ok(())
}

/// Toggle the "currently working on this" marker.
///
/// # Errors
///
/// Returns [`DomainError::DeadlineNotFound`] when the item does not exist
/// for this owner, or an error if the write fails.
pub fn set_doing(conn: &Connection, user_id: i64, id: i64, doing: bool) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE deadlines SET is_doing = ?1, updated_at_us = ?2 \
             WHERE id = ?3 AND user_id = ?4",
            params![doing, now_us(), id, user_id],
        )
        .context("update deadline doing flag")?;

    if changed == 0 {
        return Err(DomainError::DeadlineNotFound(id).into());
    }
    Ok(())
}

/// Delete an item.
///
/// # Errors
///
/// Returns [`DomainError::DeadlineNotFound`] when the item does not exist
/// for this owner, or an error if the write fails.
pub fn remove_item(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let changed = conn
        .execute(
            "DELETE FROM deadlines WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )
        .context("delete deadline item")?;

    if changed == 0 {
        return Err(DomainError::DeadlineNotFound(id).into());
    }
    Ok(())
}

/// Write caller-supplied `(id, display_order)` pairs verbatim as one atomic
/// batch.
///
/// This is the drag-reorder path: no density or gap validation happens
/// here — the next list read reconciles whatever this produced. Ownership
/// is still enforced per row.
///
/// # Errors
///
/// Returns [`DomainError::DeadlineNotFound`] (and rolls the whole batch
/// back) when any id does not exist for this owner.
pub fn reorder(conn: &mut Connection, user_id: i64, positions: &[(i64, i64)]) -> Result<()> {
    let tx = conn.transaction().context("begin reorder transaction")?;
    let now = now_us();

    for &(id, order) in positions {
        let changed = tx
            .execute(
                "UPDATE deadlines SET display_order = ?1, updated_at_us = ?2 \
                 WHERE id = ?3 AND user_id = ?4",
                params![order, now, id, user_id],
            )
            .with_context(|| format!("reorder item {id}"))?;
        if changed == 0 {
            return Err(DomainError::DeadlineNotFound(id).into());
        }
    }

    tx.commit().context("commit reorder")?;
    debug!(user_id, count = positions.len(), "deadline list reordered");
    Ok(())
}

/// Read the user's full list, reconciling display orders on the way.
///
/// Returns incomplete items first (ascending rank 1..N), then completed
/// items, each row carrying its corrected `display_order`. Corrective
/// writes — if any — are committed atomically before the result is
/// returned; a clean list produces zero writes.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown owner, or an error
/// if the read or the corrective writes fail.
pub fn list(conn: &mut Connection, user_id: i64) -> Result<Vec<DeadlineItem>> {
    let tx = conn.transaction().context("begin list transaction")?;
    ensure_user(&tx, user_id)?;

    let items = query::list_deadlines_raw(&tx, user_id)?;
    let rows: Vec<OrderRow> = items
        .iter()
        .map(|item| OrderRow {
            id: item.id,
            display_order: item.display_order,
            is_done: item.is_done,
        })
        .collect();

    let fixes = reconcile::reconcile(&rows);
    for fix in &fixes {
        tx.execute(
            "UPDATE deadlines SET display_order = ?1 WHERE id = ?2",
            params![fix.new_order, fix.id],
        )
        .with_context(|| format!("apply order fix to item {}", fix.id))?;
    }
    tx.commit().context("commit reconciled orders")?;

    if !fixes.is_empty() {
        debug!(user_id, fixes = fixes.len(), "display orders reconciled");
    }

    Ok(apply_order(
        items,
        &fixes,
        |item| item.id,
        |item, order| item.display_order = order,
        |item| item.is_done,
    ))
}
