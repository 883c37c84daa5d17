//! Friend edges and presence lookups.
//!
//! Edges are directed, matching the original composite-key model: adding a
//! friend makes them visible in *your* list only.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::db::query;
use crate::error::DomainError;
use crate::model::FriendStatus;
use crate::now_us;
use crate::user::ensure_user;

/// Add a friend edge from `user_id` to `friend_id`.
///
/// Adding the same friend twice is a no-op.
///
/// # Errors
///
/// Returns [`DomainError::SelfFriendship`] for a self-edge,
/// [`DomainError::UserNotFound`] when either end is unknown, or an error if
/// the write fails.
pub fn add_friend(conn: &Connection, user_id: i64, friend_id: i64) -> Result<()> {
    if user_id == friend_id {
        return Err(DomainError::SelfFriendship(user_id).into());
    }
    ensure_user(conn, user_id)?;
    ensure_user(conn, friend_id)?;

    conn.execute(
        "INSERT OR IGNORE INTO friends (user_id, friend_id, created_at_us) \
         VALUES (?1, ?2, ?3)",
        params![user_id, friend_id, now_us()],
    )
    .context("insert friend edge")?;
    Ok(())
}

/// Remove a friend edge. Removing an absent edge is a no-op.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn remove_friend(conn: &Connection, user_id: i64, friend_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM friends WHERE user_id = ?1 AND friend_id = ?2",
        params![user_id, friend_id],
    )
    .context("delete friend edge")?;
    Ok(())
}

/// Ids of everyone `user_id` has added, ascending.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown user, or an error
/// if the read fails.
pub fn list_friends(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    ensure_user(conn, user_id)?;
    query::friend_ids(conn, user_id)
}

/// Presence rows for all of `user_id`'s friends.
///
/// # Errors
///
/// Returns [`DomainError::UserNotFound`] for an unknown user, or an error
/// if a read fails.
pub fn friend_statuses(conn: &Connection, user_id: i64) -> Result<Vec<FriendStatus>> {
    let ids = list_friends(conn, user_id)?;
    query::friend_statuses(conn, &ids, now_us())
}

#[cfg(test)]
mod tests {
    use super::{add_friend, friend_statuses, list_friends, remove_friend};
    use crate::db::open_in_memory;
    use crate::error::DomainError;
    use crate::user::{create_user, set_studying};
    use rusqlite::Connection;

    fn store_with_pair() -> (Connection, i64, i64) {
        let mut conn = open_in_memory().expect("open store");
        let a = create_user(&mut conn, "mei", None).expect("create");
        let b = create_user(&mut conn, "kai", None).expect("create");
        (conn, a, b)
    }

    #[test]
    fn add_is_directed_and_idempotent() {
        let (conn, a, b) = store_with_pair();
        add_friend(&conn, a, b).expect("add");
        add_friend(&conn, a, b).expect("re-add is a no-op");

        assert_eq!(list_friends(&conn, a).expect("list"), vec![b]);
        assert!(list_friends(&conn, b).expect("list").is_empty());
    }

    #[test]
    fn self_edge_is_rejected() {
        let (conn, a, _) = store_with_pair();
        let err = add_friend(&conn, a, a).expect_err("must reject");
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::SelfFriendship(a))
        );
    }

    #[test]
    fn unknown_friend_is_rejected() {
        let (conn, a, _) = store_with_pair();
        let err = add_friend(&conn, a, 404).expect_err("must reject");
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::UserNotFound(404))
        );
    }

    #[test]
    fn statuses_reflect_presence() {
        let (conn, a, b) = store_with_pair();
        add_friend(&conn, a, b).expect("add");
        set_studying(&conn, b, true).expect("studying");

        let statuses = friend_statuses(&conn, a).expect("statuses");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].friend_id, b);
        assert!(statuses[0].is_studying);
        assert!(statuses[0].current_timer_seconds.is_some());
    }

    #[test]
    fn remove_then_list_is_empty() {
        let (conn, a, b) = store_with_pair();
        add_friend(&conn, a, b).expect("add");
        remove_friend(&conn, a, b).expect("remove");
        assert!(list_friends(&conn, a).expect("list").is_empty());
    }
}
