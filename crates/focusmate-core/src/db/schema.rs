//! Canonical SQLite schema for the focusmate store.
//!
//! The schema is normalized around per-user rows:
//! - `users` keeps identity, presence, and the badge balance
//! - `deadlines` holds the ordered to-do list (dense 1..N ranks for
//!   incomplete items, `-1` for completed ones)
//! - `focus_buckets` accumulates whole minutes per `(user, date, hour)`
//! - `friends` and `messages` model the social surface
//! - `pictures` stores raw photo bytes
//! - `store_meta` tracks the applied schema version
//!
//! `deadlines.display_order` is deliberately NOT unique per user: every
//! completed item shares the `-1` sentinel, and explicit reorder writes
//! caller-supplied positions verbatim. Density is an invariant restored by
//! the reconciler on read, not a constraint the database enforces.

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    title TEXT,
    badge INTEGER,
    is_studying INTEGER NOT NULL DEFAULT 0 CHECK (is_studying IN (0, 1)),
    studying_since_us INTEGER,
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS deadlines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    task TEXT NOT NULL,
    due_date TEXT,
    is_done INTEGER NOT NULL DEFAULT 0 CHECK (is_done IN (0, 1)),
    is_doing INTEGER NOT NULL DEFAULT 0 CHECK (is_doing IN (0, 1)),
    display_order INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS focus_buckets (
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    record_date TEXT NOT NULL,
    record_hour INTEGER NOT NULL CHECK (record_hour BETWEEN 0 AND 23),
    focus_minutes INTEGER NOT NULL DEFAULT 0 CHECK (focus_minutes BETWEEN 0 AND 60),
    UNIQUE (user_id, record_date, record_hour)
);

CREATE TABLE IF NOT EXISTS friends (
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    friend_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at_us INTEGER NOT NULL,
    PRIMARY KEY (user_id, friend_id),
    CHECK (user_id <> friend_id)
);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    receiver_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    is_read INTEGER NOT NULL DEFAULT 0 CHECK (is_read IN (0, 1)),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS pictures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    img BLOB NOT NULL,
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us)
VALUES (1, 1, 0);
";

/// Migration v2: read-path indexes for the list/poll queries.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_deadlines_owner_order
    ON deadlines(user_id, display_order, id);

CREATE INDEX IF NOT EXISTS idx_deadlines_owner_done
    ON deadlines(user_id, is_done);

CREATE INDEX IF NOT EXISTS idx_messages_receiver_unread
    ON messages(receiver_id, is_read, id DESC);

CREATE INDEX IF NOT EXISTS idx_pictures_owner
    ON pictures(user_id, id);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
";

/// Indexes expected by the deadline-list and message-poll query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_deadlines_owner_order",
    "idx_deadlines_owner_done",
    "idx_messages_receiver_unread",
    "idx_pictures_owner",
];

#[cfg(test)]
mod tests {
    use crate::db::migrations;
    use rusqlite::{Connection, params};

    fn seeded_conn() -> rusqlite::Result<Connection> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrate(&mut conn)?;

        conn.execute(
            "INSERT INTO users (user_id, name, badge, created_at_us) VALUES (1, 'mei', 2, 0)",
            [],
        )?;
        conn.execute(
            "INSERT INTO users (user_id, name, created_at_us) VALUES (2, 'kai', 0)",
            [],
        )?;

        for idx in 0_i64..30 {
            conn.execute(
                "INSERT INTO deadlines (
                    user_id, task, is_done, display_order, created_at_us, updated_at_us
                 ) VALUES (1, ?1, ?2, ?3, ?4, ?4)",
                params![
                    format!("task {idx}"),
                    i64::from(idx % 3 == 0),
                    if idx % 3 == 0 { -1 } else { idx },
                    idx
                ],
            )?;
        }

        for idx in 0_i64..20 {
            conn.execute(
                "INSERT INTO messages (sender_id, receiver_id, content, is_read, created_at_us)
                 VALUES (1, 2, ?1, ?2, ?3)",
                params![format!("msg {idx}"), i64::from(idx % 2 == 0), idx],
            )?;
        }

        Ok(conn)
    }

    fn query_plan_details(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("EXPLAIN QUERY PLAN {sql}"))?;
        stmt.query_map([], |row| row.get::<_, String>(3))?
            .collect::<Result<Vec<_>, _>>()
    }

    #[test]
    fn query_plan_uses_deadline_order_index() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT id
             FROM deadlines
             WHERE user_id = 1
             ORDER BY display_order ASC, id ASC",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_deadlines_owner_order")),
            "expected deadline order index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn query_plan_uses_unread_poll_index() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT id
             FROM messages
             WHERE receiver_id = 2 AND is_read = 0
             ORDER BY id DESC
             LIMIT 1",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_messages_receiver_unread")),
            "expected unread poll index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn bucket_minutes_constraint_rejects_out_of_range() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;

        let over = conn.execute(
            "INSERT INTO focus_buckets (user_id, record_date, record_hour, focus_minutes)
             VALUES (1, '2025-03-01', 9, 61)",
            [],
        );
        assert!(over.is_err(), "61 minutes must violate the bucket CHECK");

        let bad_hour = conn.execute(
            "INSERT INTO focus_buckets (user_id, record_date, record_hour, focus_minutes)
             VALUES (1, '2025-03-01', 24, 10)",
            [],
        );
        assert!(bad_hour.is_err(), "hour 24 must violate the bucket CHECK");

        Ok(())
    }

    #[test]
    fn duplicate_display_order_is_allowed() -> rusqlite::Result<()> {
        // Completed items all share -1, and explicit reorder may write any
        // positions; density is the reconciler's job.
        let conn = seeded_conn()?;
        conn.execute(
            "INSERT INTO deadlines (
                user_id, task, is_done, display_order, created_at_us, updated_at_us
             ) VALUES (1, 'dup a', 1, -1, 0, 0)",
            [],
        )?;
        conn.execute(
            "INSERT INTO deadlines (
                user_id, task, is_done, display_order, created_at_us, updated_at_us
             ) VALUES (1, 'dup b', 1, -1, 0, 0)",
            [],
        )?;
        Ok(())
    }

    #[test]
    fn friend_edge_rejects_self_reference() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let result = conn.execute(
            "INSERT INTO friends (user_id, friend_id, created_at_us) VALUES (1, 1, 0)",
            [],
        );
        assert!(result.is_err(), "self-edge must violate the friends CHECK");
        Ok(())
    }
}
