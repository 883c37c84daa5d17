use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel `display_order` carried by every completed item.
///
/// Incomplete items hold a dense 1-based rank instead; the reconciler
/// restores that invariant on every list read.
pub const DONE_ORDER: i64 = -1;

/// One to-do entry in a user's deadline list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineItem {
    pub id: i64,
    pub user_id: i64,
    pub task: String,
    pub due_date: Option<NaiveDate>,
    pub is_done: bool,
    /// The "currently working on this" marker toggled from the list UI.
    pub is_doing: bool,
    pub display_order: i64,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

impl DeadlineItem {
    /// True when this item participates in the dense 1..N ranking.
    #[must_use]
    pub const fn is_ranked(&self) -> bool {
        !self.is_done
    }
}
