use serde::{Deserialize, Serialize};

/// A direct message between two users.
///
/// Sending one costs the sender a badge; delivery is a poll for the latest
/// unread row, so there is no conversation threading here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at_us: i64,
}

/// The newest unread message for a receiver, joined with the sender's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadMessage {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub created_at_us: i64,
}
