//! Error Types
//!
//! Centralized error handling for the session core.
//!
//! Only `login` and `mount` surface errors to callers. Timer callbacks,
//! `refresh_token` and `logout` convert every failure into a log line,
//! a notification or a forced logout.

/// Errors returned by session operations that have a caller to report to.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Bearer token must not be empty")]
    EmptyToken,

    #[error("A session is already active")]
    AlreadyAuthenticated,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Key-value store failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Refresh endpoint failures. Every variant ends the session.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Refresh endpoint returned status {0}")]
    Status(u16),

    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),

    #[error("Refresh response did not contain a token")]
    MissingToken,
}

/// Failures while reading the expiry claim out of a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum TokenDecodeError {
    #[error("Token is not a three-part dot-delimited string")]
    Malformed,

    #[error("Claims segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Claims segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
