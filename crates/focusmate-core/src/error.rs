use std::fmt;

/// Machine-readable error codes for script-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    UserNotFound,
    DeadlineNotFound,
    MessageNotFound,
    PictureNotFound,
    NegativeDuration,
    InsufficientBadges,
    SelfFriendship,
    StoreBusy,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::UserNotFound => "E2001",
            Self::DeadlineNotFound => "E2002",
            Self::MessageNotFound => "E2003",
            Self::PictureNotFound => "E2004",
            Self::NegativeDuration => "E3001",
            Self::InsufficientBadges => "E3002",
            Self::SelfFriendship => "E3003",
            Self::StoreBusy => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::UserNotFound => "User not found",
            Self::DeadlineNotFound => "Deadline item not found",
            Self::MessageNotFound => "Message not found",
            Self::PictureNotFound => "Picture not found",
            Self::NegativeDuration => "Session duration is negative",
            Self::InsufficientBadges => "No badges left to spend",
            Self::SelfFriendship => "Cannot befriend yourself",
            Self::StoreBusy => "Store is locked by another process",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `fm init` to create the store."),
            Self::ConfigParseError => Some("Fix syntax in the focusmate config.toml and retry."),
            Self::UserNotFound => Some("Check the id with `fm user show` or create one first."),
            Self::DeadlineNotFound => None,
            Self::MessageNotFound => None,
            Self::PictureNotFound => None,
            Self::NegativeDuration => Some("Pass a non-negative --seconds value."),
            Self::InsufficientBadges => {
                Some("Earn a badge with a focus session of 60 minutes or more.")
            }
            Self::SelfFriendship => None,
            Self::StoreBusy => Some("Retry after the other `fm` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Domain-level rejections surfaced by store operations.
///
/// These are caller-input failures, not retryable persistence failures:
/// no writes have happened when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The referenced user does not exist.
    #[error("user {0} not found")]
    UserNotFound(i64),

    /// The referenced deadline item does not exist (or belongs to someone else).
    #[error("deadline item {0} not found")]
    DeadlineNotFound(i64),

    /// The referenced message does not exist.
    #[error("message {0} not found")]
    MessageNotFound(i64),

    /// The referenced picture does not exist.
    #[error("picture {0} not found")]
    PictureNotFound(i64),

    /// A focus session was submitted with a negative duration.
    #[error("negative session duration: {0}s")]
    NegativeDuration(i64),

    /// Sending a message requires a badge balance of at least one.
    #[error("user {0} has no badges to spend")]
    InsufficientBadges(i64),

    /// Friend edges must connect two distinct users.
    #[error("user {0} cannot befriend themselves")]
    SelfFriendship(i64),
}

impl DomainError {
    /// The stable [`ErrorCode`] for this rejection.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::DeadlineNotFound(_) => ErrorCode::DeadlineNotFound,
            Self::MessageNotFound(_) => ErrorCode::MessageNotFound,
            Self::PictureNotFound(_) => ErrorCode::PictureNotFound,
            Self::NegativeDuration(_) => ErrorCode::NegativeDuration,
            Self::InsufficientBadges(_) => ErrorCode::InsufficientBadges,
            Self::SelfFriendship(_) => ErrorCode::SelfFriendship,
        }
    }
}
