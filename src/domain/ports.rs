//! Collaborator contracts consumed by the session core.
//!
//! Implementations live in the infrastructure and presentation layers;
//! tests substitute fakes.

use async_trait::async_trait;

use crate::domain::value_objects::Severity;
use crate::shared::error::RefreshError;

/// Exchanges the current bearer token for a new one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Issue one refresh request authenticated with `token`.
    ///
    /// Must not retry; the caller decides what a failure means.
    async fn refresh(&self, token: &str) -> Result<String, RefreshError>;
}

/// User-visible toast sink. Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Route change sink.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`, replacing the current history entry when `replace`.
    fn navigate(&self, route: &str, replace: bool);
}
