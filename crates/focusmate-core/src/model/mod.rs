//! Plain domain types shared across operations and the CLI.

mod deadline;
mod focus;
mod message;
mod user;

pub use deadline::{DONE_ORDER, DeadlineItem};
pub use focus::{DailyTotal, FocusSegment, HOURS_PER_DAY, SessionOutcome};
pub use message::{Message, UnreadMessage};
pub use user::{FriendStatus, RecordStatus, User};
