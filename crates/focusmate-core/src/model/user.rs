use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    /// Optional flair shown next to the name.
    pub title: Option<String>,
    /// Badge balance; `None` in storage is read as 0 everywhere.
    pub badge: Option<i64>,
    pub is_studying: bool,
    /// Microsecond timestamp of when the current study run started.
    pub studying_since_us: Option<i64>,
    pub created_at_us: i64,
}

impl User {
    /// Badge balance with the NULL-as-zero read rule applied.
    #[must_use]
    pub const fn badge_count(&self) -> i64 {
        match self.badge {
            Some(n) => n,
            None => 0,
        }
    }
}

/// Summary returned by the record-status read: badge balance plus today's
/// accumulated focus minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStatus {
    pub user_id: i64,
    pub badge_count: i64,
    pub is_studying: bool,
    pub minutes_today: i64,
}

/// Presence row for one friend, as shown in the friend list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendStatus {
    pub friend_id: i64,
    pub name: String,
    pub is_studying: bool,
    /// Seconds the friend's current study run has lasted; `None` when idle.
    pub current_timer_seconds: Option<i64>,
}
