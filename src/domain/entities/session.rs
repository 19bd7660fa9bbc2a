//! Client session entity and the key-value store contract it persists through.
//!
//! The persisted shape is four string keys under the namespace prefix:
//! - token: bearer credential
//! - role: opaque role identifier
//! - email: signed-in principal
//! - login_time: epoch milliseconds, decimal string

use crate::shared::error::StorageError;

/// Persisted key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Persisted key holding the opaque role identifier.
pub const ROLE_KEY: &str = "role";

/// Persisted key holding the signed-in email.
pub const EMAIL_KEY: &str = "email";

/// Persisted key holding the login timestamp (epoch ms).
pub const LOGIN_TIME_KEY: &str = "login_time";

/// In-memory authentication state.
///
/// `is_authenticated` is never stored; it is derived from `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Bearer credential
    pub token: Option<String>,

    /// Opaque role identifier
    pub role: Option<String>,

    /// Signed-in principal
    pub user_email: Option<String>,

    /// Epoch milliseconds recorded at login
    pub login_time: Option<i64>,
}

impl SessionState {
    /// Unauthenticated state.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Create a freshly logged-in state.
    pub fn new(token: String, role: String, user_email: String, login_time: i64) -> Self {
        Self {
            token: Some(token),
            role: Some(role),
            user_email: Some(user_email),
            login_time: Some(login_time),
        }
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Replace the bearer token, leaving every other field untouched.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            token: Some(token),
            ..self.clone()
        }
    }
}

/// Interim credentials held between the password step and OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    /// Short-lived token authorizing the OTP request
    pub temp_token: String,

    /// Email the OTP was sent for
    pub email: String,
}

/// A single write against a key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set(String, String),
    Remove(String),
}

/// String key-value store.
///
/// Mirrors browser storage: synchronous, string keys and values. Stores shared
/// with other applications are expected; callers scope their keys with a
/// prefix (see `NamespacedStore`).
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Apply a batch of writes as one unit.
    ///
    /// Readers never observe part of a batch.
    fn apply(&self, ops: Vec<StorageOp>) -> Result<(), StorageError>;

    /// List every key currently stored.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Remove every key, whatever its prefix.
    fn clear(&self) -> Result<(), StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(vec![StorageOp::Set(key.to_string(), value.to_string())])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply(vec![StorageOp::Remove(key.to_string())])
    }
}
