//! Logout navigation.
//!
//! The session core only announces that a session ended. This listener turns
//! that announcement into a history-replacing redirect to the entry route.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::services::SessionManager;
use crate::domain::{Navigator, SessionEvent};

/// Navigator for headless runs: records the redirect in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &str, replace: bool) {
        info!(route, replace, "Navigate");
    }
}

/// Background task redirecting to the entry route on every logout.
#[derive(Debug)]
pub struct NavigationListener {
    task: JoinHandle<()>,
}

impl NavigationListener {
    /// Subscribe to `session` and start listening.
    pub fn spawn(
        session: &SessionManager,
        navigator: Arc<dyn Navigator>,
        entry_route: impl Into<String>,
    ) -> Self {
        let mut events = session.events();
        let entry_route = entry_route.into();

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::LoggedOut { cause, .. }) => {
                        debug!(cause = %cause, route = %entry_route, "Redirecting after logout");
                        navigator.navigate(&entry_route, true);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Navigation listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Session event channel closed");
                        break;
                    }
                }
            }
        });

        Self { task }
    }

    /// Stop listening.
    pub fn stop(self) {}
}

impl Drop for NavigationListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
