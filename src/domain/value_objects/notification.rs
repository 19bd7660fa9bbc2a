//! User-visible notifications.

use std::fmt;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification text shown on login.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Logged in successfully!";

/// Default logout reason.
pub const DEFAULT_LOGOUT_MESSAGE: &str = "You have been logged out.";

/// Shown when the idle timer fires.
pub const IDLE_TIMEOUT_MESSAGE: &str = "You were logged out due to inactivity.";

/// Shown when the absolute session lifetime is exceeded.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Shown when a refresh fails.
pub const REFRESH_FAILED_MESSAGE: &str = "Session expired. Please log in again.";

/// Shown when a refresh is attempted without a persisted token.
pub const NO_TOKEN_MESSAGE: &str = "No token found";
