//! Route guards.
//!
//! Guards read nothing but "is authenticated" (and, for the OTP page, whether
//! a login is pending). They never mutate the session.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::SessionManager;
use crate::config::RouteSettings;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Allow,
    /// Navigate elsewhere instead
    Redirect { to: String, replace: bool },
}

impl GuardDecision {
    fn redirect(to: &str) -> Self {
        Self::Redirect {
            to: to.to_string(),
            replace: true,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides whether a route may render for the current session.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionManager>,
    routes: RouteSettings,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionManager>, routes: RouteSettings) -> Self {
        Self { session, routes }
    }

    /// Authenticated-only routes: unauthenticated visitors go to the login page.
    pub fn protect(&self) -> GuardDecision {
        if self.session.is_authenticated() {
            GuardDecision::Allow
        } else {
            debug!(to = %self.routes.login, "Blocked protected route");
            GuardDecision::redirect(&self.routes.login)
        }
    }

    /// Login page: signed-in users go straight to the dashboard.
    pub fn public_only(&self) -> GuardDecision {
        if self.session.is_authenticated() {
            GuardDecision::redirect(&self.routes.home)
        } else {
            GuardDecision::Allow
        }
    }

    /// OTP page: needs a pending login, and makes no sense once signed in.
    pub fn otp_stage(&self) -> GuardDecision {
        if self.session.is_authenticated() {
            return GuardDecision::redirect(&self.routes.home);
        }

        match self.session.pending_login() {
            Ok(Some(_)) => GuardDecision::Allow,
            Ok(None) => GuardDecision::redirect(&self.routes.login),
            Err(e) => {
                debug!(error = %e, "Could not read pending login");
                GuardDecision::redirect(&self.routes.login)
            }
        }
    }
}
