//! Session lifecycle events.
//!
//! Published on a broadcast channel by the session manager. Presentation
//! listeners (navigation, UI refresh) react to them; the core itself never
//! navigates.

use std::fmt;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogoutCause {
    /// Explicit user or caller request
    Explicit,
    /// No activity for the idle budget
    IdleTimeout,
    /// Absolute lifetime since login exceeded
    SessionExpired,
    /// Refresh endpoint rejected the token or failed
    RefreshFailed,
}

impl LogoutCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::IdleTimeout => "idle_timeout",
            Self::SessionExpired => "session_expired",
            Self::RefreshFailed => "refresh_failed",
        }
    }
}

impl fmt::Display for LogoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login completed and state is persisted
    LoggedIn { user_email: String },

    /// The bearer token was replaced by a refresh
    TokenRefreshed,

    /// The session ended; listeners should leave authenticated routes
    LoggedOut { cause: LogoutCause, message: String },
}
